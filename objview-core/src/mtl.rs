/// Material library (`.mtl`) parser
///
/// Recognized directives: `newmtl`, `Ka`, `Kd`, `Ks`, `Ns`, `map_Kd` and
/// `map_Ka`. Everything else is skipped. Directives apply to the most recent
/// `newmtl` of the same file; lines before the first one are ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::{BufferError, LibraryError};
use crate::material::{MaterialId, MaterialTable};
use crate::parse;
use crate::texture::TextureLoader;

/// Parse the library at `path` into `table`.
///
/// A missing or unreadable file is logged and counted, never fatal; materials
/// read before a read error are kept. Returns the number of materials added.
pub fn load_library(
    path: &Path,
    base_dir: &Path,
    table: &mut MaterialTable,
    textures: &mut dyn TextureLoader,
    diagnostics: &mut Diagnostics,
) -> Result<usize, BufferError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            log::warn!("Cannot open material library {}: {}", path.display(), e);
            diagnostics.missing_libraries += 1;
            return Ok(0);
        }
    };

    log::info!("Loading materials from {}", path.display());
    let before = table.len();
    match parse_library(BufReader::new(file), base_dir, table, textures, diagnostics) {
        Ok(added) => Ok(added),
        Err(LibraryError::Io(e)) => {
            log::warn!("Error reading material library {}: {}", path.display(), e);
            diagnostics.missing_libraries += 1;
            Ok(table.len() - before)
        }
        Err(LibraryError::Allocation(e)) => Err(e),
    }
}

/// Parse library text from any reader. Texture paths resolve against `base_dir`.
pub fn parse_library<R: BufRead>(
    reader: R,
    base_dir: &Path,
    table: &mut MaterialTable,
    textures: &mut dyn TextureLoader,
    diagnostics: &mut Diagnostics,
) -> Result<usize, LibraryError> {
    let mut current: Option<MaterialId> = None;
    let mut added = 0;

    parse::for_each_line(reader, |line| -> Result<(), LibraryError> {
        let Some((keyword, args)) = parse::directive(line) else {
            diagnostics.ignored_lines += 1;
            return Ok(());
        };

        if keyword == "newmtl" {
            match parse::first_token(args) {
                Some(name) => {
                    current = Some(table.add(name)?);
                    added += 1;
                }
                None => {
                    log::debug!("newmtl without a name: {:?}", line.trim_end());
                    diagnostics.malformed_material_lines += 1;
                }
            }
            return Ok(());
        }

        let Some(material) = current.and_then(|id| table.get_mut(id)) else {
            diagnostics.ignored_lines += 1;
            return Ok(());
        };

        let applied = match keyword {
            "Ka" => set_color(&mut material.ambient, args),
            "Kd" => set_color(&mut material.diffuse, args),
            "Ks" => set_color(&mut material.specular, args),
            "Ns" => match parse::scalar(args) {
                Ok((_, shininess)) => {
                    material.shininess = shininess;
                    true
                }
                Err(_) => false,
            },
            "map_Kd" | "map_Ka" => {
                if material.texture.is_some() {
                    return Ok(());
                }
                match parse::map_file_name(args) {
                    Some(file_name) => {
                        let path = base_dir.join(file_name);
                        material.texture = textures.load_texture(&path);
                        if material.texture.is_none() {
                            log::warn!(
                                "Material '{}' left untextured: {} failed to load",
                                material.name,
                                path.display()
                            );
                            diagnostics.failed_textures += 1;
                        }
                        material.texture_path = Some(path);
                        true
                    }
                    None => false,
                }
            }
            _ => {
                diagnostics.ignored_lines += 1;
                return Ok(());
            }
        };

        if !applied {
            log::debug!("Skipping malformed material line: {:?}", line.trim_end());
            diagnostics.malformed_material_lines += 1;
        }
        Ok(())
    })?;

    Ok(added)
}

/// Overwrite the RGB channels and force alpha to 1. Leaves the color untouched
/// unless all three channels parse.
fn set_color(color: &mut [f32; 4], args: &str) -> bool {
    match parse::vector3(args) {
        Ok((_, (r, g, b))) => {
            *color = [r, g, b, 1.0];
            true
        }
        Err(_) => false,
    }
}
