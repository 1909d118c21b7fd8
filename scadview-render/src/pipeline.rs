//! Model to preview scene pipeline

use crate::config::RenderConfig;
use crate::engine::CadEngine;
use crate::error::{RenderError, Result};
use scadview_io::{parse_off, GlbExportOptions, GlbExporter};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Evaluate `model` with `engine` and write a GLB preview to `out_dir/preview_name`
///
/// The intermediate OFF file is written next to the preview as `<stem>.off`.
/// Returns the path of the written preview.
pub fn render_preview<E: CadEngine>(
    engine: &E,
    model: &Path,
    out_dir: &Path,
    preview_name: &str,
    config: &RenderConfig,
) -> Result<PathBuf> {
    let stem = scad_stem(model)?;
    let off_path = out_dir.join(format!("{}.off", stem));

    let status = engine.evaluate(model, &off_path, config)?;
    if !status.success() {
        return Err(RenderError::EngineFailed { code: status.code });
    }

    let preview_path = out_dir.join(preview_name);
    convert_off(&off_path, &preview_path, export_options(config))?;
    Ok(preview_path)
}

/// Convert an OFF file into a GLB scene
pub fn convert_off(off_path: &Path, glb_path: &Path, options: GlbExportOptions) -> Result<()> {
    let text = fs::read_to_string(off_path)?;
    let polyhedron = parse_off(&text)?;
    info!(
        "Parsed {}: {} vertices, {} triangles, {} colors",
        off_path.display(),
        polyhedron.vertex_count(),
        polyhedron.face_count(),
        polyhedron.color_count()
    );

    let bytes = GlbExporter::new(options).export(&polyhedron)?;
    fs::write(glb_path, &bytes)?;
    info!("Wrote {} ({} bytes)", glb_path.display(), bytes.len());
    Ok(())
}

fn export_options(config: &RenderConfig) -> GlbExportOptions {
    GlbExportOptions::default()
        .with_vertex_colors(config.vertex_colors)
        .with_lights(config.lights)
}

fn scad_stem(model: &Path) -> Result<&str> {
    let is_scad = model
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("scad"));
    if !is_scad {
        return Err(RenderError::NotScadSource(model.to_path_buf()));
    }
    model
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| RenderError::NotScadSource(model.to_path_buf()))
}
