//! Change detection between a captured snapshot and the disk.

use super::SessionError;
use super::store::TemplateSnapshot;
use crate::asset::{AssetSnapshot, SnapshotOutcome, SnapshotReader};
use crate::fs::FileSystem;

pub struct ChangeDetector<'a, F: FileSystem> {
    reader: SnapshotReader<'a, F>,
}

impl<'a, F: FileSystem> ChangeDetector<'a, F> {
    pub const fn new(reader: SnapshotReader<'a, F>) -> Self {
        Self { reader }
    }

    /// Whether the canonical artifact behind `reference` differs from `old`.
    ///
    /// An asset that was tracked at capture but can no longer be read is an
    /// error, never a silent skip.
    pub fn has_changed(&self, old: &AssetSnapshot, reference: &str) -> Result<bool, SessionError> {
        match self.reader.read(reference)? {
            SnapshotOutcome::Tracked(fresh) => Ok(fresh.content != old.content),
            SnapshotOutcome::Missing(missing) => Err(SessionError::AssetVanished {
                reference: reference.to_owned(),
                path: missing.path,
            }),
            SnapshotOutcome::External => Err(SessionError::AssetVanished {
                reference: reference.to_owned(),
                path: old.canonical.clone(),
            }),
        }
    }

    /// References of `template` whose content changed, in capture order.
    pub fn changed_references<'t>(
        &self,
        template: &'t TemplateSnapshot,
    ) -> Result<Vec<&'t str>, SessionError> {
        let mut changed = Vec::new();
        for (reference, snapshot) in template.iter() {
            if self.has_changed(snapshot, reference)? {
                changed.push(reference);
            }
        }
        Ok(changed)
    }
}
