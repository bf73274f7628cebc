//! Filesystem primitives used by the stamping engine.
//!
//! The engine never touches `std::fs` directly; it goes through
//! [`FileSystem`] so the session logic stays independent of where
//! templates and artifacts actually live.

mod local;

pub use local::LocalFs;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for filesystem operations.
pub type FsResult<T> = Result<T, FsError>;

/// Filesystem operation errors, always carrying the offending path.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("file not found: `{}`", .0.display())]
    NotFound(PathBuf),

    #[error("permission denied: `{}`", .0.display())]
    PermissionDenied(PathBuf),

    #[error("I/O error on `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to walk `{}`: {}", .0.display(), .1)]
    Walk(PathBuf, String),
}

impl FsError {
    /// Classify an `io::Error` for the given path.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io(path.to_path_buf(), err),
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Blocking filesystem interface.
pub trait FileSystem {
    /// Read raw file bytes.
    fn read(&self, path: &Path) -> FsResult<Vec<u8>>;

    /// Read a UTF-8 text file.
    fn read_to_string(&self, path: &Path) -> FsResult<String>;

    /// Write text, creating parent directories as needed.
    fn write(&self, path: &Path, content: &str) -> FsResult<()>;

    /// Copy `from` to `to`, creating parent directories as needed.
    fn copy(&self, from: &Path, to: &Path) -> FsResult<()>;

    /// Remove a single file.
    fn remove(&self, path: &Path) -> FsResult<()>;

    /// Check whether a regular file exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Direct file children of `dir`, sorted by name.
    fn list_dir(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;

    /// All files below `dir` (recursive), sorted by path.
    fn walk_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>>;
}
