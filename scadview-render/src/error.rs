//! Error types for the preview pipeline

use scadview_io::OffError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while rendering a preview
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Render source must be a .scad file, got {}", .0.display())]
    NotScadSource(PathBuf),

    #[error("Failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CAD engine failed{}", code.map(|c| format!(" with exit code {}", c)).unwrap_or_default())]
    EngineFailed { code: Option<i32> },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Parse(#[from] OffError),

    #[error("Export error: {0}")]
    Export(#[from] scadview_core::Error),

    #[error("Invalid render configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Result type alias for the preview pipeline
pub type Result<T> = std::result::Result<T, RenderError>;
