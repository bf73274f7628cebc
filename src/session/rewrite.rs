//! Template rewriting from a [`RewritePlan`].

use rustc_hash::FxHashSet;
use std::path::Path;

use super::SessionError;
use super::reconcile::RewritePlan;
use super::store::SessionStore;
use crate::asset::ReferencePattern;
use crate::debug;
use crate::fs::FileSystem;

/// A template holding changed references, read and checked before any
/// artifact is touched.
pub struct PendingRewrite<'s> {
    template: &'s Path,
    text: String,
    references: Vec<&'s str>,
}

impl PendingRewrite<'_> {
    pub fn template(&self) -> &Path {
        self.template
    }
}

pub struct TemplateRewriter<'a, F: FileSystem> {
    fs: &'a F,
}

impl<'a, F: FileSystem> TemplateRewriter<'a, F> {
    pub const fn new(fs: &'a F) -> Self {
        Self { fs }
    }

    /// Read every template that holds a changed reference and locate each
    /// such reference in its current text.
    ///
    /// A reference that can no longer be found is an error, so nothing is
    /// stamped or deleted for a rewrite that could not happen.
    pub fn prepare<'s>(
        &self,
        store: &'s SessionStore,
        changed: &FxHashSet<&str>,
    ) -> Result<Vec<PendingRewrite<'s>>, SessionError> {
        let mut pending = Vec::new();

        for (template, snapshot) in store.iter() {
            let references: Vec<&str> = snapshot
                .references()
                .filter(|r| changed.contains(r))
                .collect();
            if references.is_empty() {
                continue;
            }

            let text = self.fs.read_to_string(template)?;
            if let Some(missing) = references
                .iter()
                .find(|r| !ReferencePattern::for_reference(r).is_match(&text))
            {
                return Err(SessionError::ReferenceNotFound {
                    template: template.to_path_buf(),
                    reference: (*missing).to_owned(),
                });
            }

            pending.push(PendingRewrite {
                template,
                text,
                references,
            });
        }
        Ok(pending)
    }

    /// Rewrite every planned reference of a prepared template.
    ///
    /// Returns the number of references rewritten; the file is only written
    /// when at least one was.
    pub fn apply(&self, plan: &RewritePlan, pending: PendingRewrite<'_>) -> Result<usize, SessionError> {
        let PendingRewrite {
            template,
            mut text,
            references,
        } = pending;
        let mut rewritten = 0;

        for reference in references {
            let Some(entry) = plan.get(reference) else {
                continue;
            };
            match entry.pattern.replace_all(&text, &entry.replacement) {
                Some(updated) => {
                    debug!("apply"; "{}: {} -> {}", template.display(), reference, entry.replacement);
                    text = updated;
                    rewritten += 1;
                }
                // an earlier form of the same path already covered it
                None => debug!("apply"; "{}: `{}` already rewritten", template.display(), reference),
            }
        }

        if rewritten > 0 {
            self.fs.write(template, &text)?;
        }
        Ok(rewritten)
    }
}
