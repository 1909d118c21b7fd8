//! Core data structures for scadview
//!
//! This crate provides the indexed polyhedron model shared by the OFF parser
//! and the glTF scene exporter, together with the small utilities both sides
//! need: an interning table for deduplication and fan triangulation.

pub mod color;
pub mod polyhedron;
pub mod interner;
pub mod triangulate;
pub mod error;

pub use color::*;
pub use polyhedron::*;
pub use interner::Interner;
pub use triangulate::fan_triangulate;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::Point3;
