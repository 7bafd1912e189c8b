//! Error types for the material deduplication library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scene and deduplication operations.
///
/// The deduplication pass itself never fails: malformed input (dangling
/// material references, out-of-range face indices, broken node links) is
/// skipped or treated as non-equal. Errors surface only at the I/O
/// boundary when loading or saving scene documents.
#[derive(Error, Debug)]
pub enum Error {
    /// File does not exist or cannot be accessed
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Unsupported scene document version
    #[error("Unsupported scene version: {0}")]
    UnsupportedVersion(u32),

    /// Scene document parsed but failed structural validation
    #[error("Invalid scene: {0}")]
    InvalidScene(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid scene error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidScene(msg.into())
    }
}

/// Result type alias for deduplication operations.
pub type Result<T> = std::result::Result<T, Error>;
