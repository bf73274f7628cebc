//! Capture → apply sessions over one target's templates.
//!
//! A session is a typed lifecycle:
//!
//! ```text
//! Session::open ──capture──▶ CapturedSession ──apply──▶ ApplyReport
//!                                   │
//!                                   └──close──▶ (store released)
//! ```
//!
//! `apply` only exists on [`CapturedSession`], so it cannot run before a
//! capture has completed. Snapshots live in the session's [`SessionStore`]
//! and are dropped with it; nothing persists across runs.

mod detect;
mod reconcile;
mod rewrite;
mod store;

use detect::ChangeDetector;
use reconcile::Reconciler;
use rewrite::TemplateRewriter;
use store::{SessionStore, TemplateSnapshot};

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::asset::{
    AssetResolver, ExtractPattern, MissingAsset, SnapshotOutcome, SnapshotReader, extract,
};
use crate::fs::{FileSystem, FsError};
use crate::utils::plural_count;
use crate::{debug, log};

/// Fatal session conditions.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("template not found: `{}`", .0.display())]
    TemplateMissing(PathBuf),

    #[error("{missing} (referenced as `{reference}` in `{}`)", template.display())]
    AssetMissing {
        template: PathBuf,
        reference: String,
        missing: MissingAsset,
    },

    #[error("asset `{reference}` disappeared since capture: `{}`", path.display())]
    AssetVanished { reference: String, path: PathBuf },

    #[error("reference `{reference}` no longer found in `{}`", template.display())]
    ReferenceNotFound { template: PathBuf, reference: String },

    #[error(transparent)]
    Fs(#[from] FsError),
}

/// What to do with a local reference whose file is missing at capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingPolicy {
    /// Abort the session.
    #[default]
    Fatal,
    /// Log, leave the reference untracked, and continue.
    Skip,
}

/// Shared collaborators for every phase of a session.
pub struct Engine<'a, F: FileSystem> {
    pub fs: &'a F,
    pub resolver: &'a AssetResolver,
    pub patterns: &'a [ExtractPattern],
    pub policy: MissingPolicy,
}

impl<F: FileSystem> Clone for Engine<'_, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<F: FileSystem> Copy for Engine<'_, F> {}

impl<'a, F: FileSystem> Engine<'a, F> {
    fn reader(&self) -> SnapshotReader<'a, F> {
        SnapshotReader::new(self.fs, self.resolver)
    }
}

/// A reference skipped under [`MissingPolicy::Skip`].
#[derive(Debug, Clone)]
pub struct SkippedReference {
    pub template: PathBuf,
    pub reference: String,
    pub missing: MissingAsset,
}

/// Session before capture.
pub struct Session<'a, F: FileSystem> {
    target: String,
    engine: Engine<'a, F>,
}

impl<'a, F: FileSystem> Session<'a, F> {
    pub fn open(target: impl Into<String>, engine: Engine<'a, F>) -> Self {
        let target = target.into();
        debug!("capture"; "opening session for target `{}`", target);
        Self { target, engine }
    }

    /// Scan every template in order and snapshot its local assets.
    pub fn capture(self, templates: &[PathBuf]) -> Result<CapturedSession<'a, F>, SessionError> {
        let reader = self.engine.reader();
        let mut store = SessionStore::new();
        let mut skipped = Vec::new();
        let mut external = 0;

        for template in templates {
            let text = self.engine.fs.read_to_string(template).map_err(|e| {
                if e.is_not_found() {
                    SessionError::TemplateMissing(template.clone())
                } else {
                    SessionError::Fs(e)
                }
            })?;

            let mut snapshot = TemplateSnapshot::new();
            for reference in extract(self.engine.patterns, &text) {
                if snapshot.contains(&reference) {
                    continue;
                }
                match reader.read(&reference)? {
                    SnapshotOutcome::Tracked(asset) => {
                        debug!("capture"; "{} -> {}", reference, asset.canonical.display());
                        snapshot.insert(&reference, asset);
                    }
                    SnapshotOutcome::External => {
                        debug!("capture"; "skipping external {}", reference);
                        external += 1;
                    }
                    SnapshotOutcome::Missing(missing) => {
                        log!("missing"; "{} in {}", missing, template.display());
                        match self.engine.policy {
                            MissingPolicy::Fatal => {
                                return Err(SessionError::AssetMissing {
                                    template: template.clone(),
                                    reference,
                                    missing,
                                });
                            }
                            MissingPolicy::Skip => skipped.push(SkippedReference {
                                template: template.clone(),
                                reference,
                                missing,
                            }),
                        }
                    }
                }
            }

            log!("capture"; "{}: {}", template.display(), plural_count(snapshot.len(), "asset"));
            store.insert(template.clone(), snapshot);
        }

        Ok(CapturedSession {
            target: self.target,
            engine: self.engine,
            store,
            skipped,
            external,
        })
    }
}

/// Which tracked references `apply` re-stamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApplyMode {
    /// Only references whose canonical artifact changed since capture.
    #[default]
    Changed,
    /// Every tracked reference.
    Force,
}

/// Outcome of one apply run.
#[derive(Debug, Clone, Default)]
pub struct ApplyReport {
    /// Distinct changed references, in first-seen order.
    pub changed: Vec<String>,
    pub artifacts: Vec<PathBuf>,
    pub deleted: usize,
    pub templates_rewritten: usize,
}

impl ApplyReport {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty()
    }
}

/// Session after a completed capture; snapshots are read-only from here on.
pub struct CapturedSession<'a, F: FileSystem> {
    target: String,
    engine: Engine<'a, F>,
    store: SessionStore,
    skipped: Vec<SkippedReference>,
    external: usize,
}

impl<'a, F: FileSystem> CapturedSession<'a, F> {
    pub const fn store(&self) -> &SessionStore {
        &self.store
    }

    /// References left untracked under [`MissingPolicy::Skip`].
    pub fn skipped(&self) -> &[SkippedReference] {
        &self.skipped
    }

    /// Count of external references seen during capture.
    pub const fn external(&self) -> usize {
        self.external
    }

    /// Detect changes, stamp new artifacts, and rewrite templates.
    ///
    /// Every template holding a changed reference is read and checked
    /// before any artifact is created or deleted.
    pub fn apply(&self, mode: ApplyMode) -> Result<ApplyReport, SessionError> {
        let changed = self.collect_changed(mode)?;
        if changed.is_empty() {
            log!("apply"; "no changes in `{}`", self.target);
            return Ok(ApplyReport::default());
        }
        log!("apply"; "{} changed", plural_count(changed.len(), "asset"));

        let rewriter = TemplateRewriter::new(self.engine.fs);
        let changed_set: FxHashSet<&str> = changed.iter().map(String::as_str).collect();
        let pending = rewriter.prepare(&self.store, &changed_set)?;

        let plan = Reconciler::new(self.engine.fs, self.engine.resolver).reconcile(&changed)?;

        let mut templates_rewritten = 0;
        for rewrite in pending {
            let template = rewrite.template().to_path_buf();
            let count = rewriter.apply(&plan, rewrite)?;
            if count > 0 {
                log!("apply"; "rewrote {} ({})", template.display(), plural_count(count, "reference"));
                templates_rewritten += 1;
            }
        }

        Ok(ApplyReport {
            changed,
            artifacts: plan.artifacts().to_vec(),
            deleted: plan.deleted(),
            templates_rewritten,
        })
    }

    /// Deduplicated union of changed references across templates.
    fn collect_changed(&self, mode: ApplyMode) -> Result<Vec<String>, SessionError> {
        let detector = ChangeDetector::new(self.engine.reader());
        let mut seen = FxHashSet::default();
        let mut changed = Vec::new();

        for (_, snapshot) in self.store.iter() {
            let refs = match mode {
                ApplyMode::Changed => detector.changed_references(snapshot)?,
                ApplyMode::Force => snapshot.references().collect(),
            };
            for reference in refs {
                if seen.insert(reference) {
                    changed.push(reference.to_owned());
                }
            }
        }
        Ok(changed)
    }

    /// End the session, releasing its snapshots.
    pub fn close(self) {
        debug!("apply"; "closing session for target `{}`", self.target);
    }
}
