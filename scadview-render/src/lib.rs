//! OpenSCAD preview pipeline
//!
//! Evaluates a `.scad` model with an external CAD engine into an OFF file,
//! then converts that file into a GLB scene with `scadview-io`.

pub mod value;
pub mod config;
pub mod engine;
pub mod pipeline;
pub mod error;

pub use value::ScadValue;
pub use config::RenderConfig;
pub use engine::{CadEngine, EngineStatus, OpenScadCli};
pub use pipeline::{convert_off, render_preview};
pub use error::*;
