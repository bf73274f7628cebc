//! Local disk implementation of [`FileSystem`].

use jwalk::WalkDir;
use std::fs;
use std::path::{Path, PathBuf};

use super::{FileSystem, FsError, FsResult};

/// Standard `std::fs` backed filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFs;

impl LocalFs {
    pub const fn new() -> Self {
        Self
    }

    fn ensure_parent(path: &Path) -> FsResult<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                fs::create_dir_all(parent).map_err(|e| FsError::from_io(parent, e))
            }
            _ => Ok(()),
        }
    }
}

impl FileSystem for LocalFs {
    fn read(&self, path: &Path) -> FsResult<Vec<u8>> {
        fs::read(path).map_err(|e| FsError::from_io(path, e))
    }

    fn read_to_string(&self, path: &Path) -> FsResult<String> {
        fs::read_to_string(path).map_err(|e| FsError::from_io(path, e))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        Self::ensure_parent(path)?;
        fs::write(path, content).map_err(|e| FsError::from_io(path, e))
    }

    fn copy(&self, from: &Path, to: &Path) -> FsResult<()> {
        Self::ensure_parent(to)?;
        fs::copy(from, to)
            .map(|_| ())
            .map_err(|e| FsError::from_io(from, e))
    }

    fn remove(&self, path: &Path) -> FsResult<()> {
        fs::remove_file(path).map_err(|e| FsError::from_io(path, e))
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_dir(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let entries = fs::read_dir(dir).map_err(|e| FsError::from_io(dir, e))?;
        let mut files: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        Ok(files)
    }

    fn walk_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(FsError::NotFound(dir.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir).sort(true) {
            let entry = entry.map_err(|e| FsError::Walk(dir.to_path_buf(), e.to_string()))?;
            if entry.file_type().is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }
}
