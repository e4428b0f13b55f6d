/// objview - load a Wavefront OBJ model and report what a renderer would draw
///
/// Usage: objview <model.obj> [--config objview.toml] [--default-texture]
///
/// Set RUST_LOG=debug to see every skipped line.

use anyhow::{Context, Result};
use clap::Parser;
use objview_core::{ImageTextureLoader, ObjLoader, ViewerConfig};
use objview_terminal::print_report;
use std::io::stdout;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "objview", about = "Inspect Wavefront OBJ/MTL models")]
struct Args {
    /// OBJ file to load
    model: PathBuf,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give untextured materials the fallback gradient texture
    #[arg(long)]
    default_texture: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ViewerConfig::load_from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    let mut textures = ImageTextureLoader::new(&config.textures);
    let mut model = ObjLoader::new(config.loader)
        .load(&args.model, &mut textures)
        .with_context(|| format!("Failed to load {}", args.model.display()))?;

    if args.default_texture {
        let fallback = textures.register_default()?;
        let filled = model.fill_missing_textures(fallback);
        log::info!(
            "Assigned default texture to {} material(s) and unassigned faces",
            filled
        );
    }

    print_report(&mut stdout(), &model)?;
    Ok(())
}
