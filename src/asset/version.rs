//! Versioned artifact naming for cache busting.
//!
//! A canonical artifact `name.min.ext` gets timestamped copies
//! `name.min.<token>.ext` next to it. [`VersionDetails`] holds everything
//! needed to clear the old copies and mint a new one, and
//! [`ReferencePattern`] locates a reference inside template text.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use super::{AssetResolver, canonical_path, reference_literal};

/// Last token handed out by [`next_token`].
static LAST_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Wall-clock milliseconds, strictly increasing within the process.
fn next_token() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0);

    let mut last = LAST_TOKEN.load(Ordering::SeqCst);
    loop {
        let token = now.max(last + 1);
        match LAST_TOKEN.compare_exchange(last, token, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return token,
            Err(actual) => last = actual,
        }
    }
}

/// Filesystem facts for managing one canonical artifact's versions.
#[derive(Debug, Clone)]
pub struct VersionDetails {
    pub directory: PathBuf,
    pub canonical: PathBuf,
    /// Matches file names of timestamped siblings in `directory`.
    pub old_siblings: Regex,
    pub new_artifact: PathBuf,
}

impl VersionDetails {
    /// Details for the artifact a template reference points at.
    pub fn for_reference(resolver: &AssetResolver, reference: &str) -> Self {
        Self::for_artifact(&resolver.resolve(reference))
    }

    /// Details for an artifact path (timestamped or not), with a fresh token.
    pub fn for_artifact(path: &Path) -> Self {
        Self::with_token(path, next_token())
    }

    pub fn with_token(path: &Path, token: u64) -> Self {
        let canonical = canonical_path(path);
        let directory = canonical
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let name = canonical
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let (new_name, pattern) = match name.rsplit_once('.') {
            Some((base, ext)) if !base.is_empty() => (
                format!("{base}.{token}.{ext}"),
                format!(r"^{}\.\d+\.{}$", regex::escape(base), regex::escape(ext)),
            ),
            _ => (
                format!("{name}.{token}"),
                format!(r"^{}\.\d+$", regex::escape(&name)),
            ),
        };

        Self {
            new_artifact: directory.join(new_name),
            old_siblings: Regex::new(&pattern).unwrap(),
            directory,
            canonical,
        }
    }

    /// Whether `path` is a previously generated copy of this artifact.
    pub fn is_old_sibling(&self, path: &Path) -> bool {
        path.parent() == Some(self.directory.as_path())
            && path
                .file_name()
                .is_some_and(|n| self.old_siblings.is_match(&n.to_string_lossy()))
    }
}

/// Locates a reference's literal path text inside a template.
///
/// An occurrence only counts when it is not part of a longer path: the
/// character before it (past one optional `/`) and the character after it
/// must not be path characters.
#[derive(Debug, Clone)]
pub struct ReferencePattern {
    needle: Regex,
}

impl ReferencePattern {
    /// Pattern for the path exactly as the template writes it.
    pub fn for_reference(reference: &str) -> Self {
        Self::new(reference_literal(reference))
    }

    pub fn new(literal: &str) -> Self {
        Self {
            needle: Regex::new(&regex::escape(literal)).unwrap(),
        }
    }

    /// Whether `text` holds at least one bounded occurrence.
    pub fn is_match(&self, text: &str) -> bool {
        self.needle
            .find_iter(text)
            .any(|m| is_bounded(text, m.start(), m.end()))
    }

    /// Replace every bounded occurrence, or `None` if there is none.
    pub fn replace_all(&self, text: &str, replacement: &str) -> Option<String> {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        let mut replaced = false;

        for m in self.needle.find_iter(text) {
            if !is_bounded(text, m.start(), m.end()) {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            out.push_str(replacement);
            last = m.end();
            replaced = true;
        }

        if !replaced {
            return None;
        }
        out.push_str(&text[last..]);
        Some(out)
    }
}

/// Swap the file name of a reference literal, keeping its directory part
/// exactly as written.
pub fn restamp_literal(literal: &str, file_name: &str) -> String {
    match literal.rsplit_once('/') {
        Some((dir, _)) => format!("{dir}/{file_name}"),
        None => file_name.to_owned(),
    }
}

const fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '~' | '%')
}

fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = &text[..start];
    let before = before.strip_suffix('/').unwrap_or(before);
    let prev_ok = before.chars().next_back().is_none_or(|c| !is_path_char(c));
    let next_ok = text[end..].chars().next().is_none_or(|c| !is_path_char(c));
    prev_ok && next_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens_strictly_increase() {
        let a = next_token();
        let b = next_token();
        let c = next_token();
        assert!(a < b && b < c);
    }

    #[test]
    fn test_details_from_timestamped_path() {
        let details = VersionDetails::with_token(Path::new("web/css/style.min.123.css"), 999);
        assert_eq!(details.directory, PathBuf::from("web/css"));
        assert_eq!(details.canonical, PathBuf::from("web/css/style.min.css"));
        assert_eq!(details.new_artifact, PathBuf::from("web/css/style.min.999.css"));
    }

    #[test]
    fn test_details_from_canonical_path() {
        let details = VersionDetails::with_token(Path::new("web/js/app.min.js"), 42);
        assert_eq!(details.canonical, PathBuf::from("web/js/app.min.js"));
        assert_eq!(details.new_artifact, PathBuf::from("web/js/app.min.42.js"));
    }

    #[test]
    fn test_new_artifact_never_equals_canonical() {
        let details = VersionDetails::for_artifact(Path::new("app.min.js"));
        assert_ne!(details.new_artifact, details.canonical);
    }

    #[test]
    fn test_details_for_reference() {
        let resolver = AssetResolver::new("web/");
        let details = VersionDetails::for_reference(&resolver, "{{ asset('/css/a.min.5.css') }}");
        assert_eq!(details.canonical, PathBuf::from("web/css/a.min.css"));
    }

    #[test]
    fn test_old_sibling_matching() {
        let details = VersionDetails::with_token(Path::new("web/css/style.min.css"), 1);

        assert!(details.is_old_sibling(Path::new("web/css/style.min.123.css")));
        assert!(details.is_old_sibling(Path::new("web/css/style.min.1.css")));

        // canonical itself
        assert!(!details.is_old_sibling(Path::new("web/css/style.min.css")));
        // other extension
        assert!(!details.is_old_sibling(Path::new("web/css/style.min.123.js")));
        // other base name
        assert!(!details.is_old_sibling(Path::new("web/css/mystyle.min.123.css")));
        assert!(!details.is_old_sibling(Path::new("web/css/style.landscape.min.123.css")));
        // other directory
        assert!(!details.is_old_sibling(Path::new("web/css/old/style.min.123.css")));
        // `.` in the base name is literal
        assert!(!details.is_old_sibling(Path::new("web/css/styleXmin.123.css")));
    }

    #[test]
    fn test_extensionless_artifact() {
        let details = VersionDetails::with_token(Path::new("bin/tool"), 7);
        assert_eq!(details.new_artifact, PathBuf::from("bin/tool.7"));
        assert!(details.is_old_sibling(Path::new("bin/tool.3")));
    }

    #[test]
    fn test_reference_pattern_replaces_with_leading_slash() {
        let pattern = ReferencePattern::new("css/style.min.123.css");
        let text = r#"<link rel="stylesheet" href="/css/style.min.123.css">"#;
        assert_eq!(
            pattern.replace_all(text, "css/style.min.999.css").unwrap(),
            r#"<link rel="stylesheet" href="/css/style.min.999.css">"#
        );
    }

    #[test]
    fn test_reference_pattern_keeps_helper_and_query() {
        let pattern = ReferencePattern::new("js/app.min.1.js");
        let text = r#"<script src="{{ asset('js/app.min.1.js') }}"></script><script src="js/app.min.1.js?v=2"></script>"#;
        assert_eq!(
            pattern.replace_all(text, "js/app.min.2.js").unwrap(),
            r#"<script src="{{ asset('js/app.min.2.js') }}"></script><script src="js/app.min.2.js?v=2"></script>"#
        );
    }

    #[test]
    fn test_reference_pattern_skips_longer_paths() {
        let pattern = ReferencePattern::new("css/a.min.1.css");
        let text = r#"<link href="/vendor/css/a.min.1.css"><link href="css/a.min.1.css.map"><link href="xcss/a.min.1.css">"#;
        assert!(pattern.replace_all(text, "css/a.min.2.css").is_none());
    }

    #[test]
    fn test_reference_pattern_escapes_dots() {
        let pattern = ReferencePattern::new("a.min.css");
        assert!(pattern.replace_all(r#"href="aXminXcss""#, "b").is_none());
        assert!(pattern.is_match(r#"href="a.min.css""#));
    }

    #[test]
    fn test_reference_pattern_for_reference() {
        let pattern = ReferencePattern::for_reference("{{ asset('/css/a.min.1.css?v=1') }}");
        assert!(pattern.is_match(r#"<link href="/css/a.min.1.css?v=1">"#));
        assert!(!pattern.is_match(r#"<link href="/css/a.min.12.css">"#));
    }

    #[test]
    fn test_reference_pattern_matches_written_form() {
        let dotted = ReferencePattern::for_reference("./css/a.min.1.css");
        let text = r#"<link rel="stylesheet" href="./css/a.min.1.css">"#;
        assert!(dotted.is_match(text));
        assert_eq!(
            dotted.replace_all(text, "./css/a.min.2.css").unwrap(),
            r#"<link rel="stylesheet" href="./css/a.min.2.css">"#
        );

        let doubled = ReferencePattern::for_reference("css//a.min.1.css");
        assert!(doubled.is_match(r#"href="css//a.min.1.css""#));
        assert!(!doubled.is_match(r#"href="css/a.min.1.css""#));
    }

    #[test]
    fn test_restamp_literal() {
        assert_eq!(restamp_literal("./css/a.min.1.css", "a.min.9.css"), "./css/a.min.9.css");
        assert_eq!(restamp_literal("css//a.min.css", "a.min.9.css"), "css//a.min.9.css");
        assert_eq!(restamp_literal("/a.min.1.css", "a.min.9.css"), "/a.min.9.css");
        assert_eq!(restamp_literal("a.min.1.css", "a.min.9.css"), "a.min.9.css");
    }
}
