//! Site assembly.
//!
//! Stage 3 of the publish pipeline, and the one that drives the others. A run
//! is a fixed sequence where every step must finish before the next starts:
//!
//! 1. Delete the output directory if it exists.
//! 2. Copy the template directory to the output directory (must exist).
//! 3. Scan the note root into a [`SidebarIndex`].
//! 4. Render the sidebar and write it at the top of the output directory.
//! 5. Walk the index in sidebar order; read each note, rewrite it (copying
//!    embedded attachments), and write it to the mirrored output path.
//!
//! ## Output Structure
//!
//! ```text
//! docs/
//! ├── index.html                 # from the template
//! ├── _sidebar.md                # navigation list
//! ├── P.Welcome.md               # rewritten notes, same relative paths
//! ├── assets/
//! │   └── diagram.png            # embedded attachments, byte copies
//! └── guides/
//!     └── P.Setup.md
//! ```
//!
//! Any error stops the run where it is. The template is guaranteed to be in
//! place before notes are copied; nothing else is rolled back.

use crate::config::Locations;
use crate::rewrite::{RewriteError, Rewriter};
use crate::scan::{self, ScanError};
use crate::sidebar;
use crate::types::{IndexNode, SidebarIndex};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Rewrite error: {0}")]
    Rewrite(#[from] RewriteError),
    #[error("Template directory not found: {}", .0.display())]
    MissingTemplate(PathBuf),
    #[error("Failed to read note {}: {source}", path.display())]
    ReadNote {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One note written to the output.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedNote {
    /// Path relative to both the note root and the output root, `/`-separated.
    pub rel_path: String,
    /// Embedded attachments copied for this note, in order of appearance.
    pub attachments: Vec<String>,
}

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct PublishReport {
    pub doc_root: PathBuf,
    pub sidebar_path: PathBuf,
    pub index: SidebarIndex,
    pub notes: Vec<PublishedNote>,
}

impl PublishReport {
    /// Attachment copies performed, counting repeats.
    pub fn attachment_copies(&self) -> usize {
        self.notes.iter().map(|n| n.attachments.len()).sum()
    }
}

/// Run a full publish: reset output, copy template, write sidebar and notes.
pub fn publish(loc: &Locations) -> Result<PublishReport, PublishError> {
    reset_output(&loc.template_dir, &loc.doc_root)?;

    let index = scan::scan(&loc.note_root)?;

    let sidebar_text = sidebar::render(&index);
    fs::write(&loc.sidebar_path, sidebar_text).map_err(|source| PublishError::Write {
        path: loc.sidebar_path.clone(),
        source,
    })?;
    log::info!("wrote sidebar {}", loc.sidebar_path.display());

    let rewriter = Rewriter::new(&loc.note_root, &loc.doc_root);
    let mut notes = Vec::new();
    copy_notes(
        &rewriter,
        &loc.note_root,
        &loc.doc_root,
        &index.entries,
        &mut Vec::new(),
        &mut notes,
    )?;
    log::info!(
        "published {} notes to {}",
        notes.len(),
        loc.doc_root.display()
    );

    Ok(PublishReport {
        doc_root: loc.doc_root.clone(),
        sidebar_path: loc.sidebar_path.clone(),
        index,
        notes,
    })
}

/// Delete `doc_root` and recreate it as a copy of `template_dir`.
pub fn reset_output(template_dir: &Path, doc_root: &Path) -> Result<(), PublishError> {
    if doc_root.exists() {
        log::info!("removing {}", doc_root.display());
        fs::remove_dir_all(doc_root)?;
    }
    if !template_dir.is_dir() {
        return Err(PublishError::MissingTemplate(template_dir.to_path_buf()));
    }
    fs::create_dir_all(doc_root)?;
    copy_dir_recursive(template_dir, doc_root)?;
    log::info!(
        "copied template {} → {}",
        template_dir.display(),
        doc_root.display()
    );
    Ok(())
}

fn copy_notes(
    rewriter: &Rewriter,
    note_root: &Path,
    doc_root: &Path,
    entries: &BTreeMap<String, IndexNode>,
    ancestors: &mut Vec<String>,
    published: &mut Vec<PublishedNote>,
) -> Result<(), PublishError> {
    for (name, node) in entries {
        match node {
            IndexNode::Leaf => {
                let rel: PathBuf = ancestors.iter().chain(std::iter::once(name)).collect();
                let src = note_root.join(&rel);
                let dst = doc_root.join(&rel);

                let content = fs::read_to_string(&src)
                    .map(normalize_newlines)
                    .map_err(|source| PublishError::ReadNote {
                        path: src.clone(),
                        source,
                    })?;
                let rewritten = rewriter.rewrite(name, &content, &ancestors[..])?;

                let write = || -> std::io::Result<()> {
                    if let Some(parent) = dst.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    fs::write(&dst, &rewritten.content)
                };
                write().map_err(|source| PublishError::Write {
                    path: dst.clone(),
                    source,
                })?;
                log::debug!("wrote {}", dst.display());

                published.push(PublishedNote {
                    rel_path: ancestors
                        .iter()
                        .chain(std::iter::once(name))
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join("/"),
                    attachments: rewritten.attachments,
                });
            }
            IndexNode::Directory(children) => {
                ancestors.push(name.clone());
                copy_notes(rewriter, note_root, doc_root, children, ancestors, published)?;
                ancestors.pop();
            }
        }
    }
    Ok(())
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// `\r\n` and lone `\r` line endings become `\n`.
fn normalize_newlines(text: String) -> String {
    if !text.contains('\r') {
        return text;
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PublishConfig;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn fixture_locations(tmp: &TempDir) -> Locations {
        Locations::new(
            &tmp.path().join("notes"),
            &tmp.path().join("project"),
            &PublishConfig::default(),
        )
    }

    #[test]
    fn template_copied_into_output() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        publish(&loc).unwrap();

        let tree = read_tree(&loc.doc_root);
        assert!(tree.contains_key("index.html"));
        assert!(tree.contains_key("theme/site.css"));
    }

    #[test]
    fn stale_output_removed() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        fs::create_dir_all(loc.doc_root.join("old")).unwrap();
        fs::write(loc.doc_root.join("old/stale.md"), "stale").unwrap();

        publish(&loc).unwrap();
        assert!(!loc.doc_root.join("old").exists());
    }

    #[test]
    fn missing_template_is_error() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        fs::remove_dir_all(&loc.template_dir).unwrap();

        let result = publish(&loc);
        assert!(matches!(result, Err(PublishError::MissingTemplate(_))));
    }

    #[test]
    fn sidebar_written_at_output_root() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        publish(&loc).unwrap();

        let sidebar = fs::read_to_string(&loc.sidebar_path).unwrap();
        assert_eq!(
            sidebar,
            "* [P.Welcome](/P.Welcome.md)\n\
             * guides\n\
             \x20 * [P.Cross References](/guides/P.Cross%20References.md)\n\
             \x20 * rust\n\
             \x20   * [P.Ownership](/guides/rust/P.Ownership.md)\n\
             * journal\n\
             \x20 * 2024\n\
             \x20   * [P.Retro](/journal/2024/P.Retro.md)"
        );
    }

    #[test]
    fn only_publishable_notes_written() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        let report = publish(&loc).unwrap();

        let tree = read_tree(&loc.doc_root);
        assert!(!tree.contains_key("draft.md"));
        assert!(!tree.contains_key("guides/rust/scratch.md"));
        assert!(!tree.contains_key("journal/2024/private.md"));

        let written: Vec<&str> = report.notes.iter().map(|n| n.rel_path.as_str()).collect();
        assert_eq!(
            written,
            vec![
                "P.Welcome.md",
                "guides/P.Cross References.md",
                "guides/rust/P.Ownership.md",
                "journal/2024/P.Retro.md",
            ]
        );
    }

    #[test]
    fn notes_start_with_title_heading() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        let report = publish(&loc).unwrap();

        for note in &report.notes {
            let text = fs::read_to_string(loc.doc_root.join(&note.rel_path)).unwrap();
            let file_name = note.rel_path.rsplit('/').next().unwrap();
            let expected = format!("# {}\n", crate::naming::title_of(file_name));
            assert!(text.starts_with(&expected), "{} lacks heading", note.rel_path);
            assert!(!text[expected.len()..].starts_with("# P."));
        }
    }

    #[test]
    fn nested_note_links_rewritten() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        publish(&loc).unwrap();

        let text = fs::read_to_string(loc.doc_root.join("guides/rust/P.Ownership.md")).unwrap();
        assert!(text.contains("![](../../assets/diagram.png)"));
        assert!(text.contains("[P.Cross References#Embeds](/P.Cross%20References?id=Embeds)"));
        assert!(!text.contains("[["));
    }

    #[test]
    fn attachments_copied_verbatim() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        let report = publish(&loc).unwrap();

        let src = fs::read(loc.note_root.join("assets/diagram.png")).unwrap();
        let dst = fs::read(loc.doc_root.join("assets/diagram.png")).unwrap();
        assert_eq!(src, dst);
        assert!(loc.doc_root.join("assets/team photo.jpg").exists());
        assert!(!loc.doc_root.join("assets/unused.png").exists());
        assert_eq!(report.attachment_copies(), 3);
    }

    #[test]
    fn missing_attachment_aborts_run() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);
        fs::remove_file(loc.note_root.join("assets/diagram.png")).unwrap();

        let result = publish(&loc);
        assert!(matches!(result, Err(PublishError::Rewrite(_))));
        // The template is in place even though the run failed.
        assert!(loc.doc_root.join("index.html").exists());
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let tmp = setup_fixtures();
        let loc = fixture_locations(&tmp);

        publish(&loc).unwrap();
        let first = read_tree(&loc.doc_root);
        publish(&loc).unwrap();
        let second = read_tree(&loc.doc_root);

        assert_eq!(first, second);
    }

    #[test]
    fn empty_vault_publishes_template_and_empty_sidebar() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("notes");
        let project = tmp.path().join("project");
        fs::create_dir_all(&notes).unwrap();
        fs::create_dir_all(project.join("docs_template")).unwrap();
        fs::write(project.join("docs_template/index.html"), "<html></html>").unwrap();

        let loc = Locations::new(&notes, &project, &PublishConfig::default());
        let report = publish(&loc).unwrap();

        assert!(report.notes.is_empty());
        assert_eq!(fs::read_to_string(&loc.sidebar_path).unwrap(), "");
        assert!(loc.doc_root.join("index.html").exists());
    }

    #[test]
    fn crlf_notes_written_with_lf_endings() {
        let tmp = TempDir::new().unwrap();
        let notes = tmp.path().join("notes");
        let project = tmp.path().join("project");
        fs::create_dir_all(&notes).unwrap();
        fs::create_dir_all(project.join("docs_template")).unwrap();
        fs::write(notes.join("P.Windows.md"), "one\r\ntwo [[Other]]\r\nold mac\rend").unwrap();

        let loc = Locations::new(&notes, &project, &PublishConfig::default());
        publish(&loc).unwrap();

        assert_eq!(
            fs::read_to_string(loc.doc_root.join("P.Windows.md")).unwrap(),
            "# P.Windows\none\ntwo [Other](/Other)\nold mac\nend"
        );
    }

    #[test]
    fn custom_layout_names_respected() {
        let tmp = setup_fixtures();
        let project = tmp.path().join("project");
        fs::rename(project.join("docs_template"), project.join("skeleton")).unwrap();
        let config = PublishConfig {
            template_dir: "skeleton".into(),
            output_dir: "site".into(),
            sidebar_file: "nav.md".into(),
        };
        let loc = Locations::new(&tmp.path().join("notes"), &project, &config);

        publish(&loc).unwrap();
        assert!(project.join("site/nav.md").exists());
        assert!(project.join("site/index.html").exists());
        assert!(!project.join("docs").exists());
    }
}
