use std::path::PathBuf;

use error_location::ErrorLocation;
use thiserror::Error;

/// Capture pipeline errors with source location tracking.
#[derive(Error, Debug)]
pub enum CaptureError {
    /// Directory or file creation/write failed. Raised at session arming
    /// (fatal to that attempt) or by a persistence writer (counted as a
    /// stream fault).
    #[error("Storage error at {path:?}: {source} {location}")]
    Storage {
        /// Path the filesystem operation targeted.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Session name is empty or would escape the output root.
    #[error("Invalid session name {name:?}: {reason} {location}")]
    InvalidSessionName {
        /// The rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An output buffer does not match the expected pixel count.
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual} {location}")]
    BufferMismatch {
        /// Required buffer length in bytes.
        expected: usize,
        /// Provided buffer length in bytes.
        actual: usize,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CaptureError`].
pub type Result<T> = std::result::Result<T, CaptureError>;
