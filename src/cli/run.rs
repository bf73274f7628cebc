//! `run`: capture, hooks, apply for each selected target.

use anyhow::{Context, Result};

use super::common::Workspace;
use crate::config::{StampConfig, TargetConfig};
use crate::hooks::run_between_hooks;
use crate::{debug, log};
use crate::session::{ApplyMode, ApplyReport, Session};
use crate::utils::plural_count;

/// Process targets in order, stopping at the first failing one.
pub fn run_targets(config: &StampConfig, names: &[String], force: bool) -> Result<()> {
    let workspace = Workspace::new(config)?;
    let mode = if force {
        ApplyMode::Force
    } else {
        ApplyMode::Changed
    };

    let mut total = ApplyReport::default();
    for target in workspace.targets(names)? {
        let report = run_target(&workspace, target, mode)
            .with_context(|| format!("target `{}` failed", target.name))?;
        total.changed.extend(report.changed);
        total.artifacts.extend(report.artifacts);
        total.deleted += report.deleted;
        total.templates_rewritten += report.templates_rewritten;
    }

    if total.is_noop() {
        log!("stamp"; "everything up to date");
    } else {
        log!(
            "stamp";
            "{}, {} removed, {} rewritten",
            plural_count(total.artifacts.len(), "artifact"),
            total.deleted,
            plural_count(total.templates_rewritten, "template")
        );
    }
    Ok(())
}

/// One session: open, capture, between hooks, apply, close.
fn run_target(
    workspace: &Workspace<'_>,
    target: &TargetConfig,
    mode: ApplyMode,
) -> Result<ApplyReport> {
    let templates = workspace.templates(target)?;
    if templates.is_empty() {
        log!("warning"; "target `{}` has no templates", target.name);
        return Ok(ApplyReport::default());
    }

    let session = Session::open(&target.name, workspace.engine()).capture(&templates)?;
    debug!(
        "capture";
        "`{}`: {} tracked, {} external",
        target.name,
        plural_count(session.store().asset_count(), "reference"),
        session.external()
    );
    for skipped in session.skipped() {
        log!("warning"; "untracked `{}` in {}", skipped.reference, workspace.display_path(&skipped.template));
    }

    run_between_hooks(workspace.config, &target.name)?;

    let report = session.apply(mode)?;
    session.close();
    Ok(report)
}
