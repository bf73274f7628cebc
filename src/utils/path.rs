//! Path normalization for configured directories.

use std::path::{Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`), falling
/// back to joining with the current directory for paths that do not exist
/// yet.
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Expand `~` and resolve `path` against `root` unless it is absolute.
pub fn resolve_under(path: &str, root: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
    let full = if expanded.is_absolute() {
        expanded
    } else {
        root.join(expanded)
    };
    normalize_path(&full)
}
