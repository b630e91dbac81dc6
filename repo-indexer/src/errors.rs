use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors produced while scanning a repository root.
///
/// Per-file problems (unreadable, oversized, binary) are not errors: the
/// scanner skips those files and keeps going. Only a root that cannot be
/// walked at all fails the scan.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The given root does not exist or is not a directory.
    #[error("repository root is not a readable directory: {0}")]
    InvalidRoot(PathBuf),

    /// The root exists but could not be opened for traversal.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
