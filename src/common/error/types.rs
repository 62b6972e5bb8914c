//! Unified error types for tabstate.
//!
//! Scanning itself never fails: a buffer without text yields an empty result.
//! Errors only arise at the edges, when reading session files, resolving
//! targets or loading configuration.
use std::path::PathBuf;

use thiserror::Error;

/// Main error type for tabstate operations.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Input path does not exist
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Input file is not a TabState `.bin` file
    #[error("Not a TabState file (expected .bin extension): {}", .0.display())]
    NotTabState(PathBuf),

    /// Directory contains no TabState files to decode
    #[error("No .bin files found in {}", .0.display())]
    NoTargets(PathBuf),

    /// Invalid decode options
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Map an IO error for `path`, promoting `NotFound` to [`Error::NotFound`].
    pub fn from_io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.into()),
            _ => Error::Io(err),
        }
    }
}

/// Result type for tabstate operations.
pub type Result<T> = std::result::Result<T, Error>;
