//! Error types for I/O operations

use thiserror::Error;

/// Errors that can occur while reading a model
#[derive(Error, Debug)]
pub enum IoError {
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("Parse error: {message}")]
    ParseError { message: String },

    #[error("No triangles in {path}")]
    NoGeometry { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IoError> for vitrine_core::Error {
    fn from(e: IoError) -> Self {
        vitrine_core::Error::Load(e.to_string())
    }
}
