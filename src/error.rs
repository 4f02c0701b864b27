//! Error types for reflow library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for reflow operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during layout reconstruction.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Block dump or configuration could not be decoded.
    #[error("JSON error: {0}")]
    Json(String),

    /// A layout or cleanup option is outside its accepted range.
    #[error("Invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        /// Option name
        field: &'static str,
        /// Offending value, formatted
        value: String,
        /// Why it was rejected
        reason: &'static str,
    },

    /// A block has an unusable bounding box or an empty line.
    ///
    /// Only returned in strict mode; lenient mode skips the block.
    #[error("Malformed block {block} on page {page}: {reason}")]
    MalformedBlock {
        /// Page number (1-indexed)
        page: u32,
        /// Block index in extraction order
        block: usize,
        /// What is wrong with it
        reason: String,
    },

    /// A page has a non-finite or non-positive width or height.
    ///
    /// Only returned in strict mode; lenient mode lays it out as empty.
    #[error("Malformed page {page}: {reason}")]
    MalformedPage {
        /// Page number (1-indexed)
        page: u32,
        /// What is wrong with it
        reason: String,
    },

    /// Selected page does not exist; carries the last page number.
    #[error("Page {0} is out of range (last page is {1})")]
    PageOutOfRange(u32, u32),

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// Error during rendering (text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// A directory synchronization step failed.
    #[error("Sync error at {}: {message}", path.display())]
    Sync {
        /// Path being processed
        path: PathBuf,
        /// Failure description
        message: String,
    },
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => Error::Io(err.into()),
            _ => Error::Json(err.to_string()),
        }
    }
}

impl Error {
    /// Build an [`Error::InvalidConfig`] for a numeric option.
    pub(crate) fn invalid_config(field: &'static str, value: f32, reason: &'static str) -> Self {
        Error::InvalidConfig {
            field,
            value: value.to_string(),
            reason,
        }
    }
}
