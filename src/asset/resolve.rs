//! Reference → filesystem path resolution.
//!
//! Pure functions over the reference text and the configured asset root.
//! No I/O happens here.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// `{{ asset('path') }}` helper calls (case-insensitive keyword, either quote).
static HELPER_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\{\{\s*asset\(\s*['"](.+?)['"]\s*\)\s*\}\}$"#).unwrap()
});

/// `http:`, `https:` or protocol-relative `//` prefixes.
static EXTERNAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(?i:https?:)?//").unwrap());

/// Resolves template references against the asset root.
#[derive(Debug, Clone)]
pub struct AssetResolver {
    root: PathBuf,
}

impl AssetResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Canonical filesystem path for a reference.
    ///
    /// Helper calls are unwrapped, query strings and fragments dropped, and
    /// the literal is joined onto the asset root one segment at a time so
    /// that no doubled separator survives.
    pub fn resolve(&self, reference: &str) -> PathBuf {
        let literal = reference_literal(reference);
        let mut path = self.root.clone();
        for segment in literal.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path
    }

    /// Whether a reference points outside the local filesystem.
    ///
    /// Checked both on the literal text and on the helper-unwrapped form.
    pub fn is_external(reference: &str) -> bool {
        let trimmed = reference.trim();
        EXTERNAL.is_match(trimmed) || EXTERNAL.is_match(unwrap_helper(trimmed))
    }

    /// Path relative to the asset root with `/` separators, as templates store it.
    pub fn root_relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.root).unwrap_or(path);
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .filter(|c| c != "/")
            .collect::<Vec<_>>()
            .join("/")
    }
}

/// Extract the literal from a helper call, or return the reference as-is.
fn unwrap_helper(reference: &str) -> &str {
    HELPER_CALL
        .captures(reference.trim())
        .and_then(|caps| caps.get(1))
        .map_or(reference, |m| m.as_str())
}

/// The path text of a reference as written: helper unwrapped, query and
/// fragment dropped.
pub fn reference_literal(reference: &str) -> &str {
    strip_query(unwrap_helper(reference))
}

/// Drop everything from the first `?` or `#`.
fn strip_query(literal: &str) -> &str {
    literal
        .find(['?', '#'])
        .map_or(literal, |idx| &literal[..idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> AssetResolver {
        AssetResolver::new("test/fixtures/")
    }

    #[test]
    fn test_helper_call_resolves_under_root() {
        let path = resolver().resolve("{{ asset('empty.css') }}");
        assert_eq!(path, PathBuf::from("test/fixtures/empty.css"));
    }

    #[test]
    fn test_helper_call_with_leading_slash_has_no_double_separator() {
        let path = resolver().resolve("{{ asset('/empty.css') }}");
        assert_eq!(path.to_string_lossy(), "test/fixtures/empty.css");
    }

    #[test]
    fn test_helper_call_is_case_insensitive_with_double_quotes() {
        let path = resolver().resolve(r#"{{ASSET("js/app.js")}}"#);
        assert_eq!(path, PathBuf::from("test/fixtures/js/app.js"));
    }

    #[test]
    fn test_plain_reference_is_prefixed() {
        assert_eq!(
            resolver().resolve("empty.css").to_string_lossy(),
            "test/fixtures/empty.css"
        );
        assert_eq!(
            resolver().resolve("/empty.css").to_string_lossy(),
            "test/fixtures/empty.css"
        );
    }

    #[test]
    fn test_root_with_trailing_slash() {
        let path = AssetResolver::new("web/").resolve("{{ asset('app.js') }}");
        assert_eq!(path.to_string_lossy(), "web/app.js");
    }

    #[test]
    fn test_inner_double_slashes_collapse() {
        let path = resolver().resolve("css//site/app.min.css");
        assert_eq!(path.to_string_lossy(), "test/fixtures/css/site/app.min.css");
    }

    #[test]
    fn test_query_and_fragment_are_ignored() {
        assert_eq!(
            resolver().resolve("js/app.min.12.js?v=3"),
            PathBuf::from("test/fixtures/js/app.min.12.js")
        );
        assert_eq!(
            resolver().resolve("css/app.min.css#dark"),
            PathBuf::from("test/fixtures/css/app.min.css")
        );
    }

    #[test]
    fn test_is_external() {
        assert!(AssetResolver::is_external("http://cdn.example.com/a.js"));
        assert!(AssetResolver::is_external("HTTPS://cdn.example.com/a.js"));
        assert!(AssetResolver::is_external("//maps.googleapis.com/maps/api/js"));
        assert!(AssetResolver::is_external("{{ asset('//cdn.example.com/a.css') }}"));
        assert!(!AssetResolver::is_external("/css/app.min.css"));
        assert!(!AssetResolver::is_external("js/http-client.js"));
    }

    #[test]
    fn test_root_relative() {
        let r = resolver();
        let path = r.resolve("/css/app.min.99.css");
        assert_eq!(r.root_relative(&path), "css/app.min.99.css");
    }

    #[test]
    fn test_reference_literal_keeps_written_form() {
        assert_eq!(reference_literal("./css/a.min.1.css?v=2"), "./css/a.min.1.css");
        assert_eq!(reference_literal("{{ asset('css//a.min.css#x') }}"), "css//a.min.css");
    }

    #[test]
    fn test_unwrap_helper_passthrough() {
        assert_eq!(unwrap_helper("app.js"), "app.js");
        assert_eq!(unwrap_helper("{{ asset( 'a/b.css' ) }}"), "a/b.css");
    }
}
