//! Version reconciliation: one new timestamped artifact per canonical
//! artifact, shared by every reference that points at it.

use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};

use super::SessionError;
use crate::asset::{
    AssetResolver, ReferencePattern, VersionDetails, canonical_path, reference_literal,
    restamp_literal,
};
use crate::fs::FileSystem;
use crate::{debug, log};

/// How to rewrite one reference.
#[derive(Debug, Clone)]
pub struct RewriteEntry {
    pub pattern: ReferencePattern,
    /// The reference literal with the new artifact's file name.
    pub replacement: String,
}

/// Reference → rewrite instructions for one apply run.
#[derive(Debug, Default)]
pub struct RewritePlan {
    entries: FxHashMap<String, RewriteEntry>,
    artifacts: Vec<PathBuf>,
    deleted: usize,
}

impl RewritePlan {
    pub fn get(&self, reference: &str) -> Option<&RewriteEntry> {
        self.entries.get(reference)
    }

    /// New artifacts created, in creation order.
    pub fn artifacts(&self) -> &[PathBuf] {
        &self.artifacts
    }

    /// Old timestamped siblings removed.
    pub const fn deleted(&self) -> usize {
        self.deleted
    }
}

/// References sharing one canonical artifact.
struct ArtifactGroup<'r> {
    details: VersionDetails,
    references: Vec<&'r str>,
}

pub struct Reconciler<'a, F: FileSystem> {
    fs: &'a F,
    resolver: &'a AssetResolver,
}

impl<'a, F: FileSystem> Reconciler<'a, F> {
    pub const fn new(fs: &'a F, resolver: &'a AssetResolver) -> Self {
        Self { fs, resolver }
    }

    /// Stamp every changed artifact once and build the rewrite plan.
    ///
    /// `changed` must already be deduplicated; groups are processed in
    /// first-seen order.
    pub fn reconcile(&self, changed: &[String]) -> Result<RewritePlan, SessionError> {
        let mut plan = RewritePlan::default();

        for group in self.group(changed) {
            plan.deleted += self.delete_old(&group.details);

            let details = &group.details;
            self.fs.copy(&details.canonical, &details.new_artifact)?;
            log!("stamp"; "created {}", self.display(&details.new_artifact));

            let file_name = details
                .new_artifact
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            for reference in group.references {
                plan.entries.insert(
                    reference.to_owned(),
                    RewriteEntry {
                        pattern: ReferencePattern::for_reference(reference),
                        replacement: restamp_literal(reference_literal(reference), &file_name),
                    },
                );
            }
            plan.artifacts.push(group.details.new_artifact);
        }

        Ok(plan)
    }

    /// Group references by canonical artifact, building one
    /// [`VersionDetails`] (and so one token) per group.
    fn group<'r>(&self, changed: &'r [String]) -> Vec<ArtifactGroup<'r>> {
        let mut groups: Vec<ArtifactGroup<'r>> = Vec::new();
        let mut by_canonical: FxHashMap<PathBuf, usize> = FxHashMap::default();

        for reference in changed {
            let canonical = canonical_path(&self.resolver.resolve(reference));
            let idx = *by_canonical.entry(canonical).or_insert_with(|| {
                groups.push(ArtifactGroup {
                    details: VersionDetails::for_reference(self.resolver, reference),
                    references: Vec::new(),
                });
                groups.len() - 1
            });
            groups[idx].references.push(reference);
        }

        groups
    }

    /// Remove previous timestamped copies; failures are logged and skipped.
    fn delete_old(&self, details: &VersionDetails) -> usize {
        let entries = match self.fs.list_dir(&details.directory) {
            Ok(entries) => entries,
            Err(e) => {
                log!("warning"; "cannot list {}: {}", details.directory.display(), e);
                return 0;
            }
        };

        let mut deleted = 0;
        for path in entries.iter().filter(|p| details.is_old_sibling(p)) {
            match self.fs.remove(path) {
                Ok(()) => {
                    debug!("stamp"; "deleted old {}", self.display(path));
                    deleted += 1;
                }
                Err(e) => log!("warning"; "failed to delete {}: {}", path.display(), e),
            }
        }
        deleted
    }

    fn display(&self, path: &Path) -> String {
        self.resolver.root_relative(path)
    }
}
