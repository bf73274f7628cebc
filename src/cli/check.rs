//! `check`: report references whose asset files are missing.

use anyhow::{Result, bail};
use owo_colors::OwoColorize;
use std::collections::BTreeMap;

use super::common::Workspace;
use crate::config::StampConfig;
use crate::log;
use crate::session::{MissingPolicy, Session, SkippedReference};
use crate::utils::plural_count;

/// Capture every selected target without stamping; fail if any local
/// reference is missing.
pub fn check_targets(config: &StampConfig, names: &[String]) -> Result<()> {
    let workspace = Workspace::new(config)?;
    let mut missing: BTreeMap<String, Vec<SkippedReference>> = BTreeMap::new();
    let mut template_count = 0;

    for target in workspace.targets(names)? {
        let templates = workspace.templates(target)?;
        template_count += templates.len();

        let session = Session::open(&target.name, workspace.engine_with(MissingPolicy::Skip))
            .capture(&templates)?;
        for skipped in session.skipped() {
            missing
                .entry(workspace.display_path(&skipped.template).into_owned())
                .or_default()
                .push(skipped.clone());
        }
        session.close();
    }

    let error_count: usize = missing.values().map(Vec::len).sum();
    if error_count == 0 {
        log!("check"; "{} checked, {}", plural_count(template_count, "template"), "all assets present".green());
        return Ok(());
    }

    print_missing(&missing);
    bail!(
        "{} in {}",
        plural_count(error_count, "missing asset"),
        plural_count(missing.len(), "template")
    )
}

fn print_missing(missing: &BTreeMap<String, Vec<SkippedReference>>) {
    eprintln!();
    for (template, refs) in missing {
        eprintln!("{}{}{}", "[".dimmed(), template.cyan(), "]".dimmed());
        for skipped in refs {
            eprintln!("{} {} {}", "→".red(), skipped.reference, skipped.missing);
        }
    }
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    fn config_for(root: &std::path::Path) -> StampConfig {
        let mut config = test_parse_config(
            r#"
[[targets]]
name = "default"
templates = ["index.html"]
"#,
        );
        config.root = root.to_path_buf();
        config
    }

    #[test]
    fn test_check_passes_when_assets_exist() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("js")).unwrap();
        fs::write(dir.path().join("js/app.min.js"), "x").unwrap();
        fs::write(dir.path().join("index.html"), "<script src=\"/js/app.min.js\"></script>").unwrap();

        assert!(check_targets(&config_for(dir.path()), &[]).is_ok());
    }

    #[test]
    fn test_check_fails_on_missing_without_mutation() {
        let dir = TempDir::new().unwrap();
        let page = "<script src=\"/js/app.min.3.js\"></script>";
        fs::write(dir.path().join("index.html"), page).unwrap();

        assert!(check_targets(&config_for(dir.path()), &[]).is_err());
        assert_eq!(fs::read_to_string(dir.path().join("index.html")).unwrap(), page);
    }
}
