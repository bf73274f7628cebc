//! `[[patterns]]` section configuration.
//!
//! Providing any pattern replaces the built-in script/stylesheet pair;
//! merging them would produce duplicate matches.
//!
//! # Example
//!
//! ```toml
//! [[patterns]]
//! name = "script"
//! regex = '(?i)<script[^>]*?\ssrc="([^"]+?\.js[^"]*)"'
//!
//! [[patterns]]
//! name = "stylesheet"
//! regex = '(?i)<link[^>]*?\shref="([^"]+)"[^>]*>'
//! exclude = '(?i)\srel="(?:canonical|alternate|icon)"'
//! ```

use serde::{Deserialize, Serialize};

use crate::asset::{ExtractPattern, PatternError};
use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Display name (defaults to the pattern's position).
    pub name: Option<String>,
    /// Regex whose first capturing group is the reference.
    pub regex: String,
    /// Drop matches whose full text matches this regex.
    pub exclude: Option<String>,
}

impl PatternConfig {
    pub fn display_name(&self, idx: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("pattern{idx}"))
    }

    pub fn compile(&self, idx: usize) -> Result<ExtractPattern, PatternError> {
        ExtractPattern::new(&self.display_name(idx), &self.regex, self.exclude.as_deref())
    }

    pub fn validate(&self, idx: usize, diag: &mut ConfigDiagnostics) {
        if self.regex.is_empty() {
            diag.error(FieldPath::indexed("patterns", idx, "regex"), "must not be empty");
            return;
        }
        match self.compile(idx) {
            Ok(_) => {}
            Err(PatternError::NoCaptureGroup(_)) => diag.error_with_hint(
                FieldPath::indexed("patterns", idx, "regex"),
                "has no capturing group",
                "wrap the reference text in (...); the first group is used",
            ),
            Err(PatternError::Regex(name, err)) => {
                let field = if name.ends_with(".exclude") { "exclude" } else { "regex" };
                diag.error(FieldPath::indexed("patterns", idx, field), err.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_no_patterns_uses_defaults() {
        let config = test_parse_config("");
        assert!(config.patterns.is_empty());
        let compiled = config.compile_patterns().unwrap();
        assert_eq!(compiled.len(), 2);
        assert_eq!(compiled[0].name(), "script");
        assert_eq!(compiled[1].name(), "stylesheet");
    }

    #[test]
    fn test_custom_pattern() {
        let config = test_parse_config(
            r#"
[[patterns]]
name = "img"
regex = '<img[^>]*\ssrc="([^"]+)"'
"#,
        );
        let compiled = config.compile_patterns().unwrap();
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].name(), "img");
    }

    #[test]
    fn test_invalid_patterns_reported() {
        let config = test_parse_config(
            r#"
[[patterns]]
regex = '<script>'

[[patterns]]
regex = '(ok)'
exclude = '(broken'
"#,
        );
        let mut diag = crate::config::ConfigDiagnostics::new();
        for (idx, p) in config.patterns.iter().enumerate() {
            p.validate(idx, &mut diag);
        }
        assert_eq!(diag.len(), 2);
        assert_eq!(diag.errors()[0].field.as_str(), "patterns[0].regex");
        assert_eq!(diag.errors()[1].field.as_str(), "patterns[1].exclude");
    }
}
