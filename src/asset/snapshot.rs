//! Asset content snapshots.
//!
//! A snapshot is always taken from the *canonical* artifact (`app.min.js`),
//! never from a timestamped sibling (`app.min.123.js`): the sibling is the
//! thing being rewritten, so its bytes never drift.

use regex::Regex;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use super::AssetResolver;
use crate::fs::{FileSystem, FsResult};

/// Embedded timestamp segment of a versioned artifact name.
static TIMESTAMP_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.min\.\d+\.").unwrap());

/// Content and identity of a tracked asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetSnapshot {
    pub content: Vec<u8>,
    /// Un-timestamped parent artifact the content was read from.
    pub canonical: PathBuf,
}

impl AssetSnapshot {
    /// Short blake3 fingerprint of the content, for display.
    pub fn fingerprint(&self) -> String {
        hex::encode(&blake3::hash(&self.content).as_bytes()[..8])
    }
}

/// Which file was found missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingKind {
    /// The file the reference resolves to.
    Reference,
    /// The un-timestamped parent of a timestamped reference.
    Canonical,
}

/// A local reference whose file is absent on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    pub kind: MissingKind,
    pub path: PathBuf,
}

impl fmt::Display for MissingAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MissingKind::Reference => write!(f, "asset not found: {}", self.path.display()),
            MissingKind::Canonical => {
                write!(f, "parent artifact not found: {}", self.path.display())
            }
        }
    }
}

/// Result of reading one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotOutcome {
    Tracked(AssetSnapshot),
    /// `http:`, `https:` or `//` reference; nothing to track.
    External,
    Missing(MissingAsset),
}

/// Remove an embedded `.min.<digits>.` segment from the file name.
///
/// Paths without such a segment are returned unchanged.
pub fn canonical_path(path: &Path) -> PathBuf {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return path.to_path_buf();
    };
    let stripped = TIMESTAMP_SEGMENT.replace(&name, ".min.");
    if stripped == name {
        path.to_path_buf()
    } else {
        path.with_file_name(&*stripped)
    }
}

/// Reads snapshots through a [`FileSystem`].
pub struct SnapshotReader<'a, F: FileSystem> {
    fs: &'a F,
    resolver: &'a AssetResolver,
}

impl<'a, F: FileSystem> SnapshotReader<'a, F> {
    pub const fn new(fs: &'a F, resolver: &'a AssetResolver) -> Self {
        Self { fs, resolver }
    }

    /// Snapshot the canonical artifact behind `reference`.
    ///
    /// Missing files are reported as [`SnapshotOutcome::Missing`]; only
    /// unexpected I/O failures come back as `Err`.
    pub fn read(&self, reference: &str) -> FsResult<SnapshotOutcome> {
        if AssetResolver::is_external(reference) {
            return Ok(SnapshotOutcome::External);
        }

        let resolved = self.resolver.resolve(reference);
        if !self.fs.exists(&resolved) {
            return Ok(SnapshotOutcome::Missing(MissingAsset {
                kind: MissingKind::Reference,
                path: resolved,
            }));
        }

        let canonical = canonical_path(&resolved);
        if !self.fs.exists(&canonical) {
            return Ok(SnapshotOutcome::Missing(MissingAsset {
                kind: MissingKind::Canonical,
                path: canonical,
            }));
        }

        let content = self.fs.read(&canonical)?;
        Ok(SnapshotOutcome::Tracked(AssetSnapshot { content, canonical }))
    }
}
