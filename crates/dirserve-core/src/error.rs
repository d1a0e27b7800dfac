//! Error types for `dirserve-core`.
//!
//! All fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`.

use std::path::PathBuf;

/// Unified error type for all core operations.
///
/// Each variant captures just enough context for the caller to pick a
/// response status and log a meaningful message.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The target path does not exist.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The process lacks permission to access the path.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A directory was expected but the path points to something else.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A regular file was expected but the path points to something else.
    #[error("not a file: {0}")]
    NotAFile(PathBuf),

    /// The relative path would resolve to a location outside the root.
    #[error("path escapes root: {0}")]
    OutsideRoot(String),

    /// A file name is invalid (empty, contains path separators, etc.).
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Classifies an I/O error raised while accessing `path`.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => CoreError::NotFound(path.to_path_buf()),
            // A parent component is a regular file, so the path cannot exist.
            std::io::ErrorKind::NotADirectory => CoreError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => CoreError::PermissionDenied(path.to_path_buf()),
            _ => CoreError::Io(err),
        }
    }

    /// Returns `true` when the error was caused by the caller's input rather
    /// than the state of the filesystem.
    pub fn is_malformed_request(&self) -> bool {
        matches!(self, CoreError::OutsideRoot(_) | CoreError::InvalidName(_))
    }
}

/// Convenience alias used throughout `dirserve-core`.
pub type CoreResult<T> = Result<T, CoreError>;
