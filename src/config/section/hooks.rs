//! Hooks configuration.
//!
//! Hooks run after capture and before apply: this is where the minifiers
//! that regenerate the canonical artifacts belong.
//!
//! # Example
//!
//! ```toml
//! [[hooks.between]]
//! name = "uglify"
//! command = ["npx", "uglifyjs", "$MINSTAMP_ASSET_PATH/js/app.js", "-o", "$MINSTAMP_ASSET_PATH/js/app.min.js"]
//!
//! [[hooks.between]]
//! command = ["npx", "cleancss", "-o", "$MINSTAMP_ASSET_PATH/css/style.min.css", "$MINSTAMP_ASSET_PATH/css/style.css"]
//! quiet = false
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Commands run between capture and apply, in order.
    pub between: Vec<HookConfig>,
}

impl HooksConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (idx, hook) in self.between.iter().enumerate() {
            if hook.enable && hook.command.is_empty() {
                diag.error(
                    FieldPath::indexed("hooks.between", idx, "command"),
                    "must not be empty",
                );
            }
        }
    }
}

/// Configuration for a single hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HookConfig {
    /// Whether this hook is enabled (default: true).
    pub enable: bool,

    /// Display name for logging (defaults to command[0]).
    pub name: Option<String>,

    /// Command and arguments to execute.
    /// Supports `$MINSTAMP_*` variable substitution.
    pub command: Vec<String>,

    /// Suppress output (default: true).
    pub quiet: bool,
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            enable: true,
            name: None,
            command: Vec::new(),
            quiet: true,
        }
    }
}

impl HookConfig {
    /// Returns `name` if set, otherwise falls back to `command[0]`.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .unwrap_or_else(|| self.command.first().map(String::as_str).unwrap_or("hook"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_empty_hooks() {
        let config = test_parse_config("");
        assert!(config.hooks.between.is_empty());
    }

    #[test]
    fn test_between_hook() {
        let config = test_parse_config(
            r#"
[[hooks.between]]
command = ["cleancss", "-o", "$MINSTAMP_ASSET_PATH/css/style.min.css"]
"#,
        );
        let hook = &config.hooks.between[0];
        assert!(hook.enable);
        assert!(hook.quiet);
        assert_eq!(hook.display_name(), "cleancss");
    }

    #[test]
    fn test_named_disabled_hook() {
        let config = test_parse_config(
            r#"
[[hooks.between]]
name = "minify"
enable = false
command = []
"#,
        );
        let hook = &config.hooks.between[0];
        assert_eq!(hook.display_name(), "minify");

        let mut diag = ConfigDiagnostics::new();
        config.hooks.validate(&mut diag);
        assert!(diag.is_empty());
    }
}
