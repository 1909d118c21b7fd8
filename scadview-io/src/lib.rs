//! OFF parsing and glTF export for scadview
//!
//! This crate reads the OFF polyhedra produced by OpenSCAD and writes them as
//! binary glTF scenes ready for a real-time viewer.
//!
//! ```
//! use scadview_io::{export_glb, parse_off};
//!
//! let polyhedron = parse_off("OFF 3 1 0\n0 0 0\n1 0 0\n0 1 0\n3 0 1 2\n").unwrap();
//! let glb = export_glb(&polyhedron).unwrap();
//! assert_eq!(&glb[..4], b"glTF");
//! ```

pub mod off;
pub mod glb;
pub mod gltf;
pub mod error;

pub use error::*;
pub use off::{parse_off, parse_off_with, OffParseOptions, OffReader};
pub use glb::{export_glb, pack_primitives, GlbExportOptions, GlbExporter, GlbWriter, PackedPrimitive};
pub use gltf::{read_glb, GlbContainer};

use scadview_core::{IndexedPolyhedron, Result};
use std::path::Path;

/// Trait for reading polyhedra from files
pub trait PolyhedronReader {
    fn read_polyhedron<P: AsRef<Path>>(path: P) -> Result<IndexedPolyhedron>;
}

/// Trait for writing polyhedra as scenes
pub trait SceneWriter {
    fn write_scene<P: AsRef<Path>>(polyhedron: &IndexedPolyhedron, path: P) -> Result<()>;
}

/// Auto-detect format and read a polyhedron
pub fn read_polyhedron<P: AsRef<Path>>(path: P) -> Result<IndexedPolyhedron> {
    let path = path.as_ref();
    match extension_of(path).as_deref() {
        Some("off") => OffReader::read_polyhedron(path),
        _ => Err(scadview_core::Error::UnsupportedFormat(format!(
            "Unsupported polyhedron format: {:?}",
            path.extension()
        ))),
    }
}

/// Auto-detect format and write a scene
pub fn write_scene<P: AsRef<Path>>(polyhedron: &IndexedPolyhedron, path: P) -> Result<()> {
    let path = path.as_ref();
    match extension_of(path).as_deref() {
        Some("glb") => GlbWriter::write_scene(polyhedron, path),
        _ => Err(scadview_core::Error::UnsupportedFormat(format!(
            "Unsupported scene format: {:?}",
            path.extension()
        ))),
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}
