//! Per-session snapshot storage.

use rustc_hash::{FxHashMap, FxHashSet};
use std::path::{Path, PathBuf};

use crate::asset::AssetSnapshot;

/// Snapshots of every tracked asset in one template, in extraction order.
///
/// A reference is stored once; later duplicates are ignored.
#[derive(Debug, Clone, Default)]
pub struct TemplateSnapshot {
    assets: Vec<(String, AssetSnapshot)>,
    seen: FxHashSet<String>,
}

impl TemplateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a snapshot. Returns `false` if the reference was already present.
    pub fn insert(&mut self, reference: &str, snapshot: AssetSnapshot) -> bool {
        if !self.seen.insert(reference.to_owned()) {
            return false;
        }
        self.assets.push((reference.to_owned(), snapshot));
        true
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.seen.contains(reference)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AssetSnapshot)> {
        self.assets.iter().map(|(r, s)| (r.as_str(), s))
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|(r, _)| r.as_str())
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }
}

/// Template path → snapshot, in capture order.
#[derive(Debug, Default)]
pub struct SessionStore {
    templates: Vec<(PathBuf, TemplateSnapshot)>,
    index: FxHashMap<PathBuf, usize>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a template's snapshot, replacing an earlier capture of the same path.
    pub fn insert(&mut self, template: PathBuf, snapshot: TemplateSnapshot) {
        if let Some(&idx) = self.index.get(&template) {
            self.templates[idx].1 = snapshot;
            return;
        }
        self.index.insert(template.clone(), self.templates.len());
        self.templates.push((template, snapshot));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &TemplateSnapshot)> {
        self.templates.iter().map(|(p, s)| (p.as_path(), s))
    }

    /// Total tracked references across all templates.
    pub fn asset_count(&self) -> usize {
        self.templates.iter().map(|(_, s)| s.len()).sum()
    }
}
