//! Template scanning: pull asset references out of raw template text.
//!
//! Templates are not parsed; each configured pattern is run over the text
//! and its first capturing group is taken as the reference.

use regex::Regex;
use thiserror::Error;

/// `<script ... src="....js">` references.
pub const DEFAULT_SCRIPT: &str = r#"(?i)<script\b[^>]*?\ssrc="([^"]+?\.js[^"]*)""#;

/// `<link ... href="...">` references, matched up to the end of the tag so
/// that `rel` can be checked wherever it appears.
pub const DEFAULT_STYLESHEET: &str = r#"(?i)<link\b[^>]*?\shref="([^"]+)"[^>]*>"#;

/// Non-stylesheet `<link>` relations.
pub const DEFAULT_STYLESHEET_EXCLUDE: &str = r#"(?i)\srel="(?:canonical|alternate|icon)""#;

#[derive(Debug, Error)]
pub enum PatternError {
    #[error("pattern `{0}` does not compile")]
    Regex(String, #[source] regex::Error),

    #[error("pattern `{0}` has no capturing group for the reference")]
    NoCaptureGroup(String),
}

/// A compiled extraction pattern.
#[derive(Debug, Clone)]
pub struct ExtractPattern {
    name: String,
    regex: Regex,
    /// Matches whose full text hits this regex are dropped.
    exclude: Option<Regex>,
}

impl ExtractPattern {
    pub fn new(name: &str, regex: &str, exclude: Option<&str>) -> Result<Self, PatternError> {
        let compiled = Regex::new(regex).map_err(|e| PatternError::Regex(name.to_owned(), e))?;
        if compiled.captures_len() < 2 {
            return Err(PatternError::NoCaptureGroup(name.to_owned()));
        }

        let exclude = exclude
            .filter(|e| !e.is_empty())
            .map(Regex::new)
            .transpose()
            .map_err(|e| PatternError::Regex(format!("{name}.exclude"), e))?;

        Ok(Self {
            name: name.to_owned(),
            regex: compiled,
            exclude,
        })
    }

    /// Script-tag and stylesheet-link patterns.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("script", DEFAULT_SCRIPT, None).unwrap(),
            Self::new(
                "stylesheet",
                DEFAULT_STYLESHEET,
                Some(DEFAULT_STYLESHEET_EXCLUDE),
            )
            .unwrap(),
        ]
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// References matched in `text`, in match order.
    ///
    /// Each call starts a fresh scan, so the sequence can be restarted.
    pub fn references<'p, 't>(&'p self, text: &'t str) -> impl Iterator<Item = &'t str> + 'p
    where
        't: 'p,
    {
        self.regex.captures_iter(text).filter_map(move |caps| {
            let whole = caps.get(0)?.as_str();
            if self.exclude.as_ref().is_some_and(|ex| ex.is_match(whole)) {
                return None;
            }
            caps.get(1).map(|m| m.as_str())
        })
    }
}

/// Every reference found in `text`: pattern order first, then match order.
///
/// Duplicates are kept.
pub fn extract(patterns: &[ExtractPattern], text: &str) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|pattern| pattern.references(text))
        .map(str::to_owned)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINKS: &str = r#"<!DOCTYPE html>
<html>
<head>
    <link rel="canonical" href="http://example.com/page">
    <link rel="icon" href="/favicon.ico">
    <link rel="stylesheet" href="/css/one.min.css">
    <link rel="stylesheet" type="text/css" media="screen" href="css/two.min.12.css">
    <link href="{{ asset('css/three.min.css') }}" rel="stylesheet">
    <link href="/feed.xml" rel="alternate">
</head>
<body></body>
</html>"#;

    const SCRIPTS: &str = r#"<html>
<body>
    <script type="text/javascript" src="/js/one.min.js"></script>
    <script src="//cdn.example.com/lib/jquery.min.js"></script>
    <script src="js/two.min.3.js?v=1"></script>
    <script>var inline = true;</script>
</body>
</html>"#;

    fn script() -> ExtractPattern {
        ExtractPattern::defaults().remove(0)
    }

    fn stylesheet() -> ExtractPattern {
        ExtractPattern::defaults().remove(1)
    }

    #[test]
    fn test_stylesheets_skip_non_stylesheet_rel() {
        let refs: Vec<_> = stylesheet().references(LINKS).collect();
        assert_eq!(
            refs,
            vec![
                "/css/one.min.css",
                "css/two.min.12.css",
                "{{ asset('css/three.min.css') }}"
            ]
        );
    }

    #[test]
    fn test_no_scripts_in_link_template() {
        assert_eq!(script().references(LINKS).count(), 0);
    }

    #[test]
    fn test_scripts_in_order() {
        let refs: Vec<_> = script().references(SCRIPTS).collect();
        assert_eq!(
            refs,
            vec![
                "/js/one.min.js",
                "//cdn.example.com/lib/jquery.min.js",
                "js/two.min.3.js?v=1"
            ]
        );
        assert_eq!(stylesheet().references(SCRIPTS).count(), 0);
    }

    #[test]
    fn test_extract_concatenates_in_pattern_order() {
        let text = format!("{LINKS}\n{SCRIPTS}");
        let refs = extract(&ExtractPattern::defaults(), &text);
        assert_eq!(refs.len(), 6);
        assert_eq!(refs[0], "/js/one.min.js");
        assert_eq!(refs[3], "/css/one.min.css");
    }

    #[test]
    fn test_extract_keeps_duplicates() {
        let text = r#"<script src="a.min.js"></script><script src="a.min.js"></script>"#;
        let refs = extract(&ExtractPattern::defaults(), text);
        assert_eq!(refs, vec!["a.min.js", "a.min.js"]);
    }

    #[test]
    fn test_extract_is_repeatable() {
        let patterns = ExtractPattern::defaults();
        let first = extract(&patterns, SCRIPTS);
        let second = extract(&patterns, SCRIPTS);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_template() {
        assert!(extract(&ExtractPattern::defaults(), "").is_empty());
    }

    #[test]
    fn test_pattern_requires_capture_group() {
        let err = ExtractPattern::new("bad", r"<script>", None).unwrap_err();
        assert!(matches!(err, PatternError::NoCaptureGroup(_)));
    }

    #[test]
    fn test_invalid_regex() {
        let err = ExtractPattern::new("bad", r"(unclosed", None).unwrap_err();
        assert!(matches!(err, PatternError::Regex(..)));
    }

    #[test]
    fn test_custom_pattern() {
        let pattern = ExtractPattern::new("img", r#"<img[^>]*\ssrc="([^"]+)""#, None).unwrap();
        let refs: Vec<_> = pattern
            .references(r#"<img alt="x" src="img/logo.min.png">"#)
            .collect();
        assert_eq!(refs, vec!["img/logo.min.png"]);
        assert_eq!(pattern.name(), "img");
    }
}
