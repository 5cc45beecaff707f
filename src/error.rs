//! Typed errors for the failures callers need to tell apart.
//!
//! Everything else travels as `anyhow::Error` with context attached at the I/O boundary.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a directory scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist
    #[error("Directory does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The scan root exists but is not a directory
    #[error("Not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    /// Directory iteration failed (permission denied, vanished directory, link loop)
    #[error("Error accessing directory {}: {source}", path.display())]
    Traversal {
        /// Entry the walk failed on
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: io::Error,
    },
}

/// Failures writing the baseline database.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The path cannot be written as a single whitespace-free token
    #[error("Path cannot be stored in the baseline database (contains whitespace): {0:?}")]
    UnrepresentablePath(String),
}

/// A string that is not a valid fingerprint (16 or 32 lower-case hex digits).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid fingerprint: {0:?}")]
pub struct InvalidFingerprint(pub String);
