//! `[[targets]]` section configuration.
//!
//! A target is one named set of templates processed in a single session.
//!
//! # Example
//!
//! ```toml
//! [[targets]]
//! name = "default"
//! templates = ["templates/base.html.twig", "templates/admin"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::fs::{FileSystem, FsResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    pub name: String,
    /// Template files or directories, relative to the project root.
    pub templates: Vec<PathBuf>,
}

impl TargetConfig {
    pub fn validate(&self, idx: usize, diag: &mut ConfigDiagnostics) {
        if self.name.trim().is_empty() {
            diag.error(FieldPath::indexed("targets", idx, "name"), "must not be empty");
        }
        if self.templates.is_empty() {
            diag.error_with_hint(
                FieldPath::indexed("targets", idx, "templates"),
                "no templates listed",
                "add template files or directories, e.g. [\"templates\"]",
            );
        }
    }

    /// Template files in listing order; directories expand to their files
    /// with a matching extension, sorted by path.
    pub fn template_files<F: FileSystem>(
        &self,
        fs: &F,
        root: &Path,
        extensions: &[String],
    ) -> FsResult<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in &self.templates {
            let path = root.join(entry);
            if path.is_dir() {
                files.extend(
                    fs.walk_files(&path)?
                        .into_iter()
                        .filter(|f| has_extension(f, extensions)),
                );
            } else {
                files.push(path);
            }
        }

        let mut seen = rustc_hash::FxHashSet::default();
        files.retain(|f| seen.insert(f.clone()));
        Ok(files)
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy())
        .is_some_and(|e| extensions.iter().any(|x| x.eq_ignore_ascii_case(&e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use crate::fs::LocalFs;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_targets() {
        let config = test_parse_config(
            r#"
[[targets]]
name = "spa"
templates = ["spa/index.html"]
"#,
        );
        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].name, "spa");
    }

    #[test]
    fn test_template_files_expands_directories() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("tpl/admin")).unwrap();
        fs::write(root.join("tpl/base.twig"), "").unwrap();
        fs::write(root.join("tpl/admin/index.HTML"), "").unwrap();
        fs::write(root.join("tpl/notes.txt"), "").unwrap();
        fs::write(root.join("layout.html"), "").unwrap();

        let target = TargetConfig {
            name: "default".into(),
            templates: vec!["layout.html".into(), "tpl".into(), "layout.html".into()],
        };
        let exts = vec!["html".to_string(), "twig".to_string()];
        let files = target.template_files(&LocalFs::new(), root, &exts).unwrap();

        assert_eq!(
            files,
            vec![
                root.join("layout.html"),
                root.join("tpl/admin/index.HTML"),
                root.join("tpl/base.twig"),
            ]
        );
    }

    #[test]
    fn test_missing_file_entry_is_kept() {
        let dir = TempDir::new().unwrap();
        let target = TargetConfig {
            name: "default".into(),
            templates: vec!["gone.html".into()],
        };
        let files = target
            .template_files(&LocalFs::new(), dir.path(), &[])
            .unwrap();
        assert_eq!(files, vec![dir.path().join("gone.html")]);
    }

    #[test]
    fn test_validate() {
        let mut diag = ConfigDiagnostics::new();
        TargetConfig::default().validate(0, &mut diag);
        assert_eq!(diag.len(), 2);
    }
}
