//! Hook execution utilities.
//!
//! Provides environment variable building and command execution for hooks.

use anyhow::{Context, Result, bail};
use rustc_hash::FxHashMap;
use std::process::{Command, Stdio};

use crate::config::{HookConfig, StampConfig};

// ============================================================================
// Environment Variables
// ============================================================================

/// Build `$MINSTAMP_*` environment variables for hook execution
pub fn build_vars(config: &StampConfig, target: &str) -> FxHashMap<String, String> {
    let mut vars = FxHashMap::default();
    vars.insert("MINSTAMP_ROOT".into(), config.root.display().to_string());
    vars.insert(
        "MINSTAMP_ASSET_PATH".into(),
        config.asset_root().display().to_string(),
    );
    vars.insert("MINSTAMP_TARGET".into(), target.into());
    vars
}

// ============================================================================
// Command Argument Resolution
// ============================================================================

/// Resolve `$MINSTAMP_*` variables in command arguments
pub fn resolve_args(args: &[String], vars: &FxHashMap<String, String>) -> Vec<String> {
    args.iter()
        .map(|arg| {
            let mut result = arg.clone();
            for (key, value) in vars {
                let pattern = format!("${}", key);
                result = result.replace(&pattern, value);
            }
            result
        })
        .collect()
}

// ============================================================================
// Hook Execution
// ============================================================================

/// Execute a single hook from the project root.
///
/// A non-zero exit status is an error.
pub fn run_hook(hook: &HookConfig, config: &StampConfig, target: &str) -> Result<()> {
    if !hook.enable || hook.command.is_empty() {
        return Ok(());
    }

    let vars = build_vars(config, target);
    let resolved = resolve_args(&hook.command, &vars);
    let (program, args) = resolved
        .split_first()
        .context("hook command is empty")?;

    if !hook.quiet {
        crate::log!("hook"; "`{}` running", hook.display_name());
    } else {
        crate::debug!("hook"; "`{}` running", hook.display_name());
    }

    let output = Command::new(program)
        .args(args)
        .current_dir(&config.root)
        .envs(&vars)
        .stdin(Stdio::null())
        .output()
        .with_context(|| format!("failed to spawn hook `{}`", hook.display_name()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!(
            "hook `{}` failed ({}): {}",
            hook.display_name(),
            output.status,
            stderr.trim()
        );
    }

    // Print output directly without prefix (unless quiet)
    if !hook.quiet {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            println!("{stdout}");
        }
    }

    Ok(())
}

/// Execute all between hooks in order, stopping at the first failure.
pub fn run_between_hooks(config: &StampConfig, target: &str) -> Result<()> {
    for hook in &config.hooks.between {
        run_hook(hook, config, target)?;
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
