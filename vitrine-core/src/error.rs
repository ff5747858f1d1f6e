//! Error types for vitrine

use thiserror::Error;

/// Main error type for vitrine operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The viewer could not be constructed (bad container size, surface creation)
    #[error("{0}")]
    Setup(String),

    /// The model could not be fetched or parsed
    #[error("{0}")]
    Load(String),

    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl Error {
    /// Whether this error happened while constructing a viewer
    pub fn is_setup(&self) -> bool {
        matches!(self, Error::Setup(_) | Error::Gpu(_))
    }

    /// Whether this error happened while loading a model
    pub fn is_load(&self) -> bool {
        matches!(self, Error::Load(_) | Error::Io(_) | Error::InvalidData(_) | Error::UnsupportedFormat(_))
    }
}

/// Result type alias for vitrine operations
pub type Result<T> = std::result::Result<T, Error>;
