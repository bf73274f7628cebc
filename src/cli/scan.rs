//! `scan`: list each template's asset references and their status.

use anyhow::Result;
use owo_colors::OwoColorize;
use rustc_hash::FxHashSet;
use std::path::PathBuf;

use super::common::Workspace;
use crate::asset::{SnapshotOutcome, SnapshotReader, extract};
use crate::config::StampConfig;
use crate::fs::FileSystem;
use crate::log;
use crate::utils::plural_count;

/// Status of one reference found in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceStatus {
    /// Local asset with its canonical artifact and content fingerprint.
    Tracked { canonical: PathBuf, fingerprint: String },
    External,
    Missing(String),
}

/// One template's references in document order, duplicates removed.
#[derive(Debug, Clone)]
pub struct TemplateScan {
    pub template: PathBuf,
    pub references: Vec<(String, ReferenceStatus)>,
}

/// Scan the selected targets and print what was found.
pub fn scan_targets(config: &StampConfig, names: &[String]) -> Result<()> {
    let workspace = Workspace::new(config)?;
    for target in workspace.targets(names)? {
        let templates = workspace.templates(target)?;
        log!("scan"; "target `{}`: {}", target.name, plural_count(templates.len(), "template"));
        for scan in scan_templates(&workspace, &templates)? {
            print_scan(&workspace, &scan);
        }
    }
    Ok(())
}

/// Read-only pass over templates; nothing is stamped or rewritten.
pub fn scan_templates(workspace: &Workspace<'_>, templates: &[PathBuf]) -> Result<Vec<TemplateScan>> {
    let reader = SnapshotReader::new(&workspace.fs, &workspace.resolver);
    let mut scans = Vec::with_capacity(templates.len());

    for template in templates {
        let text = workspace.fs.read_to_string(template)?;
        let mut seen = FxHashSet::default();
        let mut references = Vec::new();
        for reference in extract(&workspace.patterns, &text) {
            if !seen.insert(reference.clone()) {
                continue;
            }
            let status = match reader.read(&reference)? {
                SnapshotOutcome::Tracked(asset) => ReferenceStatus::Tracked {
                    fingerprint: asset.fingerprint(),
                    canonical: asset.canonical,
                },
                SnapshotOutcome::External => ReferenceStatus::External,
                SnapshotOutcome::Missing(missing) => ReferenceStatus::Missing(missing.to_string()),
            };
            references.push((reference, status));
        }
        scans.push(TemplateScan {
            template: template.clone(),
            references,
        });
    }
    Ok(scans)
}

fn print_scan(workspace: &Workspace<'_>, scan: &TemplateScan) {
    println!(
        "{}{}{}",
        "[".dimmed(),
        workspace.display_path(&scan.template).cyan(),
        "]".dimmed()
    );
    for (reference, status) in &scan.references {
        match status {
            ReferenceStatus::Tracked {
                canonical,
                fingerprint,
            } => println!(
                "{} {} {} {}",
                "→".green(),
                reference,
                workspace.display_path(canonical).dimmed(),
                fingerprint.dimmed()
            ),
            ReferenceStatus::External => {
                println!("{} {} {}", "→".dimmed(), reference, "external".dimmed())
            }
            ReferenceStatus::Missing(reason) => println!("{} {} {}", "→".red(), reference, reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_scan_templates_statuses() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("css")).unwrap();
        fs::write(root.join("css/site.min.css"), "body{}").unwrap();
        fs::write(root.join("css/site.min.7.css"), "body{}").unwrap();
        let template = root.join("index.html");
        fs::write(
            &template,
            concat!(
                "<link rel=\"stylesheet\" href=\"/css/site.min.7.css\">\n",
                "<link rel=\"stylesheet\" href=\"/css/site.min.7.css\">\n",
                "<script src=\"https://cdn.example.com/lib.min.js\"></script>\n",
                "<script src=\"/js/gone.min.js\"></script>\n",
            ),
        )
        .unwrap();

        let mut config = test_parse_config("");
        config.root = root.to_path_buf();
        let workspace = Workspace::new(&config).unwrap();

        let scans = scan_templates(&workspace, &[template]).unwrap();
        let refs = &scans[0].references;
        assert_eq!(refs.len(), 3);
        // script pattern runs before the stylesheet pattern
        assert_eq!(refs[0].1, ReferenceStatus::External);
        assert!(matches!(refs[1].1, ReferenceStatus::Missing(_)));
        assert!(matches!(
            &refs[2].1,
            ReferenceStatus::Tracked { canonical, .. } if canonical.ends_with("css/site.min.css")
        ));
    }
}
