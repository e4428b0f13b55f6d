/// Terminal report for loaded OBJ models
use crossterm::{
    queue,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
};
use objview_core::{Material, MeshModel};
use std::io::{self, Write};

/// Camera distance as a multiple of the model size
pub const CAMERA_DISTANCE_FACTOR: f32 = 2.0;
/// Far plane as a multiple of the model size
pub const FAR_PLANE_FACTOR: f32 = 100.0;

/// Convert a material's diffuse color to a terminal color
pub fn swatch(material: &Material) -> Color {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(material.diffuse[0]),
        g: channel(material.diffuse[1]),
        b: channel(material.diffuse[2]),
    }
}

/// Print counts, bounds, framing and per-material batches
pub fn print_report<W: Write>(writer: &mut W, model: &MeshModel) -> io::Result<()> {
    let bounds = model.bounds();
    let framing = bounds.framing_size();

    queue!(
        writer,
        SetAttribute(Attribute::Bold),
        Print(format!("{}\n", model.source().display())),
        SetAttribute(Attribute::Reset),
        Print(format!(
            "  vertices {} | normals {} | texcoords {} | faces {} | materials {}\n",
            model.vertices().len(),
            model.normals().len(),
            model.texcoords().len(),
            model.faces().len(),
            model.materials().len()
        )),
        Print(format!(
            "  center ({:.3}, {:.3}, {:.3}) | size {:.3}\n",
            bounds.center.x, bounds.center.y, bounds.center.z, bounds.size
        )),
        Print(format!(
            "  camera distance {:.3} | far plane {:.3}\n",
            framing * CAMERA_DISTANCE_FACTOR,
            framing * FAR_PLANE_FACTOR
        ))
    )?;

    for batch in model.batches() {
        let shading = batch.shading(model);
        let label = match batch.material {
            Some(_) => shading.name.as_str(),
            None => "(no material)",
        };
        let texture = match batch.texture(model) {
            Some(handle) => format!("texture #{}", handle.get()),
            None => "untextured".to_string(),
        };

        queue!(
            writer,
            SetForegroundColor(swatch(&shading)),
            Print("  ██ "),
            ResetColor,
            Print(format!(
                "{:<24} {:>8} faces  {}\n",
                label,
                batch.faces.len(),
                texture
            ))
        )?;
    }

    let diagnostics = model.diagnostics();
    if !diagnostics.is_clean() {
        queue!(
            writer,
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "  skipped lines {} | unresolved materials {} | missing libraries {} | failed textures {}\n",
                diagnostics.skipped(),
                diagnostics.unresolved_materials,
                diagnostics.missing_libraries,
                diagnostics.failed_textures
            )),
            ResetColor
        )?;
    }

    writer.flush()
}
