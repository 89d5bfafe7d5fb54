//! CLI output formatting.
//!
//! Every entry leads with its positional index among its siblings and its
//! title; paths follow as indented context lines. Directories are shown by
//! name with a trailing `/`.
//!
//! ## Check
//!
//! ```text
//! Notes
//! 001 P.Welcome
//!     Source: P.Welcome.md
//! 002 guides/
//!     001 P.Setup
//!         Source: guides/P.Setup.md
//!
//! 2 publishable notes
//! ```
//!
//! ## Build
//!
//! ```text
//! Sidebar → docs/_sidebar.md
//! P.Welcome.md → docs/P.Welcome.md
//!     Attachment: assets/diagram.png
//! guides/P.Setup.md → docs/guides/P.Setup.md
//!
//! Published 2 notes, 1 attachment copy
//! ```
//!
//! `format_*` functions return lines and do no I/O; `print_*` wrappers write
//! them to stdout.

use crate::naming;
use crate::publish::PublishReport;
use crate::types::{IndexNode, SidebarIndex};
use std::collections::BTreeMap;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

// ============================================================================
// Check
// ============================================================================

/// Format the scanned index as a tree of notes and directories.
pub fn format_scan_output(index: &SidebarIndex) -> Vec<String> {
    let mut lines = vec!["Notes".to_string()];
    walk_index(&index.entries, 0, &mut Vec::new(), &mut lines);
    lines.push(String::new());
    lines.push(plural(index.note_count(), "publishable note", "publishable notes"));
    lines
}

fn walk_index(
    entries: &BTreeMap<String, IndexNode>,
    depth: usize,
    ancestors: &mut Vec<String>,
    lines: &mut Vec<String>,
) {
    let pad = indent(depth);
    for (i, (name, node)) in entries.iter().enumerate() {
        let position = format_index(i + 1);
        match node {
            IndexNode::Leaf => {
                lines.push(format!("{pad}{position} {}", naming::title_of(name)));
                ancestors.push(name.clone());
                lines.push(format!("{pad}    Source: {}", ancestors.join("/")));
                ancestors.pop();
            }
            IndexNode::Directory(children) => {
                lines.push(format!("{pad}{position} {name}/"));
                ancestors.push(name.clone());
                walk_index(children, depth + 1, ancestors, lines);
                ancestors.pop();
            }
        }
    }
}

/// Print scan output to stdout.
pub fn print_scan_output(index: &SidebarIndex) {
    for line in format_scan_output(index) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

/// Format what a publish run wrote, one note per entry.
pub fn format_publish_output(report: &PublishReport) -> Vec<String> {
    let mut lines = Vec::new();
    let out = report.doc_root.display();

    lines.push(format!(
        "Sidebar \u{2192} {}",
        report.sidebar_path.display()
    ));
    for note in &report.notes {
        lines.push(format!("{} \u{2192} {}/{}", note.rel_path, out, note.rel_path));
        for attachment in &note.attachments {
            lines.push(format!("    Attachment: {attachment}"));
        }
    }

    lines.push(String::new());
    lines.push(format!(
        "Published {}, {}",
        plural(report.notes.len(), "note", "notes"),
        plural(
            report.attachment_copies(),
            "attachment copy",
            "attachment copies"
        )
    ));
    lines
}

/// Print publish output to stdout.
pub fn print_publish_output(report: &PublishReport) {
    for line in format_publish_output(report) {
        println!("{}", line);
    }
}
