//! Error types for `pathpick-core`.
//!
//! Fallible operations in the core library return [`CoreResult<T>`],
//! which is an alias for `Result<T, CoreError>`. Failures scoped to a single
//! directory entry are never errors: they surface as
//! [`EntryKind::StatError`](crate::fs::entry::EntryKind::StatError) entries.

use std::path::PathBuf;

/// Unified error type for all core operations.
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

    /// Reading a directory that passed the existence check failed.
    #[error("cannot list {path}: {source}")]
    DirectoryList {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Recursive directory creation failed.
    #[error("cannot create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse a TOML configuration file.
    #[error("config parse error: {0}")]
    ConfigParse(String),

    /// An I/O error that doesn't fit a more specific variant.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout `pathpick-core`.
pub type CoreResult<T> = Result<T, CoreError>;
