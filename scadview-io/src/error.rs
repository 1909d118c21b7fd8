//! Error types for OFF parsing

use thiserror::Error;

/// Errors raised while parsing OFF text.
///
/// Line numbers are 1-based and count every physical line of the input,
/// including blank and comment lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OffError {
    #[error("Invalid OFF file: no content")]
    Empty,

    #[error("Invalid OFF file: missing OFF header")]
    MissingHeader,

    #[error("Invalid OFF file: invalid vertex or face counts at line {line}")]
    InvalidCounts { line: usize },

    #[error("Invalid OFF file: not enough lines, expected {expected} vertex and face lines but found {found}")]
    NotEnoughLines { expected: usize, found: usize },

    #[error("Invalid OFF file: invalid vertex at line {line}")]
    InvalidVertex { line: usize },

    #[error("Invalid OFF file: invalid face at line {line}: {reason}")]
    InvalidFace { line: usize, reason: String },

    #[error("Invalid OFF file: face at line {line} must have at least 3 vertices, got {count}")]
    DegenerateFace { line: usize, count: usize },
}

impl OffError {
    /// The offending line, when the error is tied to one
    pub fn line(&self) -> Option<usize> {
        match self {
            OffError::InvalidCounts { line }
            | OffError::InvalidVertex { line }
            | OffError::InvalidFace { line, .. }
            | OffError::DegenerateFace { line, .. } => Some(*line),
            OffError::Empty | OffError::MissingHeader | OffError::NotEnoughLines { .. } => None,
        }
    }
}

impl From<OffError> for scadview_core::Error {
    fn from(err: OffError) -> Self {
        scadview_core::Error::Parse {
            line: err.line(),
            message: err.to_string(),
        }
    }
}
