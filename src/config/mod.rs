//! Configuration management for `minstamp.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [[patterns]], [[targets]], [[hooks.between]]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # config file lookup
//! └── mod.rs         # StampConfig (this file)
//! ```
//!
//! # Example
//!
//! ```toml
//! asset_path = "web/"
//! missing = "fatal"
//!
//! [[targets]]
//! name = "default"
//! templates = ["app/Resources/views"]
//! ```

pub mod section;
pub mod types;
mod util;

pub use section::{HookConfig, HooksConfig, PatternConfig, TargetConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use anyhow::Result;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::asset::{AssetResolver, ExtractPattern, PatternError};
use crate::cli::Cli;
use crate::log;
use crate::session::MissingPolicy;
use crate::utils::path::{normalize_path, resolve_under};

/// Root configuration structure representing minstamp.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StampConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Asset root that template references resolve against.
    pub asset_path: String,

    /// Policy for local references whose file is missing at capture.
    pub missing: MissingPolicy,

    /// Template extensions picked up when a target lists a directory.
    pub extensions: Vec<String>,

    /// Extraction patterns; empty means the built-in defaults.
    pub patterns: Vec<PatternConfig>,

    pub targets: Vec<TargetConfig>,

    pub hooks: HooksConfig,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            asset_path: ".".into(),
            missing: MissingPolicy::default(),
            extensions: vec!["html".into(), "htm".into(), "twig".into()],
            patterns: Vec::new(),
            targets: Vec::new(),
            hooks: HooksConfig::default(),
        }
    }
}

impl StampConfig {
    /// Load configuration, searching upward from cwd for the config file,
    /// then apply CLI overrides and validate.
    pub fn load(cli: &Cli) -> Result<Self> {
        let path = util::find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&path)?;
        config.config_path = normalize_path(&path);
        config.root = config
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        config.apply_cli(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path, warning about unknown fields.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Apply global CLI overrides.
    fn apply_cli(&mut self, cli: &Cli) {
        crate::logger::set_verbose(cli.verbose);

        if let Some(asset_path) = &cli.asset_path {
            self.asset_path = asset_path.clone();
        }
        if cli.skip_missing {
            self.missing = MissingPolicy::Skip;
        }
    }

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        if self.asset_path.trim().is_empty() {
            diag.error_with_hint(
                FieldPath::new("asset_path"),
                "must not be empty",
                "use \".\" for the project root",
            );
        }

        for (idx, pattern) in self.patterns.iter().enumerate() {
            pattern.validate(idx, &mut diag);
        }

        let mut names = FxHashSet::default();
        for (idx, target) in self.targets.iter().enumerate() {
            target.validate(idx, &mut diag);
            if !target.name.is_empty() && !names.insert(target.name.as_str()) {
                diag.error(
                    FieldPath::indexed("targets", idx, "name"),
                    format!("duplicate target name `{}`", target.name),
                );
            }
        }
        if self.targets.is_empty() {
            diag.error_with_hint(
                FieldPath::new("targets"),
                "no targets configured",
                "add a [[targets]] section with a name and templates",
            );
        }

        self.hooks.validate(&mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Absolute asset root.
    pub fn asset_root(&self) -> PathBuf {
        resolve_under(&self.asset_path, &self.root)
    }

    pub fn resolver(&self) -> AssetResolver {
        AssetResolver::new(self.asset_root())
    }

    /// Compiled extraction patterns (built-in defaults when none configured).
    pub fn compile_patterns(&self) -> Result<Vec<ExtractPattern>, PatternError> {
        if self.patterns.is_empty() {
            return Ok(ExtractPattern::defaults());
        }
        self.patterns
            .iter()
            .enumerate()
            .map(|(idx, p)| p.compile(idx))
            .collect()
    }

    /// Targets selected by name, in the order given; all targets when
    /// `names` is empty.
    pub fn select_targets(&self, names: &[String]) -> Result<Vec<&TargetConfig>, ConfigError> {
        if names.is_empty() {
            return Ok(self.targets.iter().collect());
        }
        names
            .iter()
            .map(|name| {
                self.targets
                    .iter()
                    .find(|t| &t.name == name)
                    .ok_or_else(|| ConfigError::UnknownTarget(name.clone()))
            })
            .collect()
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config from TOML, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> StampConfig {
    let (parsed, ignored) = StampConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
