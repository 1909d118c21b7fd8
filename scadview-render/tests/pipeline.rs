//! Preview pipeline tests with an in-process engine

use scadview_render::{
    convert_off, render_preview, CadEngine, EngineStatus, RenderConfig, RenderError, ScadValue,
};
use scadview_io::{read_glb, GlbExportOptions};
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

const TETRAHEDRON: &str = "OFF
4 4 6
0 0 0
1 0 0
0 1 0
0 0 1
3 0 2 1
3 0 1 3 255 0 0
3 1 2 3
3 0 3 2 255 0 0 255
";

/// Writes a fixed OFF file and records what it was asked to do
struct FakeEngine {
    off: &'static str,
    code: Option<i32>,
    calls: RefCell<Vec<(PathBuf, PathBuf)>>,
}

impl FakeEngine {
    fn new(off: &'static str) -> Self {
        Self {
            off,
            code: Some(0),
            calls: RefCell::new(Vec::new()),
        }
    }

    fn failing(code: Option<i32>) -> Self {
        Self {
            off: "",
            code,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl CadEngine for FakeEngine {
    fn evaluate(
        &self,
        source: &Path,
        output: &Path,
        config: &RenderConfig,
    ) -> scadview_render::Result<EngineStatus> {
        assert_eq!(config.defines.get("$preview"), Some(&ScadValue::Bool(true)));
        self.calls
            .borrow_mut()
            .push((source.to_path_buf(), output.to_path_buf()));
        if self.code == Some(0) {
            fs::write(output, self.off)?;
        }
        Ok(EngineStatus { code: self.code })
    }
}

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scadview_render_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn test_render_preview() {
    let dir = scratch_dir("preview");
    let engine = FakeEngine::new(TETRAHEDRON);

    let preview = render_preview(
        &engine,
        Path::new("/models/tetra.scad"),
        &dir,
        "preview.glb",
        &RenderConfig::default(),
    )
    .unwrap();

    assert_eq!(preview, dir.join("preview.glb"));
    let calls = engine.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, PathBuf::from("/models/tetra.scad"));
    assert_eq!(calls[0].1, dir.join("tetra.off"));

    let glb = read_glb(&fs::read(&preview).unwrap()).unwrap();
    let doc = &glb.document;
    assert_eq!(doc.materials.len(), 2);
    assert_eq!(doc.meshes[0].primitives.len(), 2);
    assert!(doc.extensions.is_some());
    assert_eq!(doc.nodes.len(), 3);

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_config_controls_export() {
    let dir = scratch_dir("config");
    let engine = FakeEngine::new(TETRAHEDRON);
    let config = RenderConfig::default()
        .with_vertex_colors(true)
        .with_lights(false);

    let preview = render_preview(&engine, Path::new("tetra.scad"), &dir, "out.glb", &config).unwrap();
    let glb = read_glb(&fs::read(&preview).unwrap()).unwrap();
    let doc = &glb.document;
    assert!(doc.extensions.is_none());
    assert_eq!(doc.nodes.len(), 1);
    assert!(doc.meshes[0]
        .primitives
        .iter()
        .all(|p| p.attributes.contains_key("COLOR_0")));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_engine_failure() {
    let dir = scratch_dir("failure");
    let engine = FakeEngine::failing(Some(1));

    let result = render_preview(&engine, Path::new("broken.scad"), &dir, "preview.glb", &RenderConfig::default());
    assert!(matches!(result, Err(RenderError::EngineFailed { code: Some(1) })));
    assert!(!dir.join("preview.glb").exists());

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_rejects_non_scad_source() {
    let engine = FakeEngine::new(TETRAHEDRON);
    let result = render_preview(
        &engine,
        Path::new("model.stl"),
        &std::env::temp_dir(),
        "preview.glb",
        &RenderConfig::default(),
    );
    assert!(matches!(result, Err(RenderError::NotScadSource(_))));
    assert!(engine.calls.borrow().is_empty());
}

#[test]
fn test_invalid_off_output() {
    let dir = scratch_dir("invalid");
    let engine = FakeEngine::new("OFF\n3 1 0\n0 0 0\n1 0 0\n");

    let result = render_preview(&engine, Path::new("bad.scad"), &dir, "preview.glb", &RenderConfig::default());
    assert!(matches!(result, Err(RenderError::Parse(_))));

    let _ = fs::remove_dir_all(dir);
}

#[test]
fn test_convert_off() {
    let dir = scratch_dir("convert");
    let off = dir.join("tetra.off");
    let glb = dir.join("tetra.glb");
    fs::write(&off, TETRAHEDRON).unwrap();

    convert_off(&off, &glb, GlbExportOptions::default().with_generator("test")).unwrap();
    let container = read_glb(&fs::read(&glb).unwrap()).unwrap();
    assert_eq!(container.document.asset.generator.as_deref(), Some("test"));

    assert!(matches!(
        convert_off(&dir.join("missing.off"), &glb, GlbExportOptions::default()),
        Err(RenderError::Io(_))
    ));

    let _ = fs::remove_dir_all(dir);
}
