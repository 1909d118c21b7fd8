//! Error types for scadview

use thiserror::Error;

/// Main error type for scadview operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse { line: Option<usize>, message: String },

    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    #[error("Invalid GLB container: {0}")]
    InvalidGlb(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Result type alias for scadview operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Shorthand for an [`Error::InvariantViolation`]
    pub fn invariant<S: Into<String>>(message: S) -> Self {
        Error::InvariantViolation(message.into())
    }
}
