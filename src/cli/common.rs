//! Common utilities shared across CLI commands.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::asset::{AssetResolver, ExtractPattern};
use crate::config::{StampConfig, TargetConfig};
use crate::fs::LocalFs;
use crate::debug;
use crate::session::{Engine, MissingPolicy};

/// Everything a command needs to open sessions against the local disk.
pub struct Workspace<'c> {
    pub config: &'c StampConfig,
    pub fs: LocalFs,
    pub resolver: AssetResolver,
    pub patterns: Vec<ExtractPattern>,
}

impl<'c> Workspace<'c> {
    pub fn new(config: &'c StampConfig) -> Result<Self> {
        let patterns = config
            .compile_patterns()
            .context("invalid extraction pattern")?;
        debug!(
            "scan";
            "patterns: {}",
            patterns.iter().map(ExtractPattern::name).collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            config,
            fs: LocalFs::new(),
            resolver: config.resolver(),
            patterns,
        })
    }

    /// Engine using the configured missing-asset policy.
    pub fn engine(&self) -> Engine<'_, LocalFs> {
        self.engine_with(self.config.missing)
    }

    pub fn engine_with(&self, policy: MissingPolicy) -> Engine<'_, LocalFs> {
        Engine {
            fs: &self.fs,
            resolver: &self.resolver,
            patterns: &self.patterns,
            policy,
        }
    }

    /// Targets selected on the command line, in order.
    pub fn targets(&self, names: &[String]) -> Result<Vec<&'c TargetConfig>> {
        Ok(self.config.select_targets(names)?)
    }

    /// Template files for one target.
    pub fn templates(&self, target: &TargetConfig) -> Result<Vec<PathBuf>> {
        target
            .template_files(&self.fs, &self.config.root, &self.config.extensions)
            .with_context(|| format!("failed to list templates for target `{}`", target.name))
    }

    /// Path relative to the project root, for display.
    pub fn display_path<'p>(&self, path: &'p Path) -> std::borrow::Cow<'p, str> {
        path.strip_prefix(&self.config.root)
            .unwrap_or(path)
            .to_string_lossy()
    }
}
