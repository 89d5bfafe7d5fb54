//! Sidebar rendering.
//!
//! Turns the [`SidebarIndex`] into the nested bullet list the documentation
//! site uses as navigation:
//!
//! ```text
//! * [P.Welcome](/P.Welcome.md)
//! * guides
//!   * [P.Setup](/guides/P.Setup.md)
//!   * rust
//!     * [P.Ownership](/guides/rust/P.Ownership.md)
//! ```
//!
//! Every level is sorted lexicographically. Directories become plain
//! heading bullets, notes become links whose target is the root-relative
//! path with each segment percent-encoded on its own.

use crate::naming;
use crate::types::{IndexNode, SidebarIndex};
use crate::urls;
use std::collections::BTreeMap;

const INDENT: &str = "  ";

/// Render the whole index, one list item per line.
pub fn render_lines(index: &SidebarIndex) -> Vec<String> {
    generate_lines(&index.entries, &[])
}

/// Render the index as the text written to the sidebar file.
///
/// Lines are joined with `\n`; no trailing newline is added.
pub fn render(index: &SidebarIndex) -> String {
    render_lines(index).join("\n")
}

/// Render one level of the index below `ancestors`.
pub fn generate_lines(entries: &BTreeMap<String, IndexNode>, ancestors: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    for (name, node) in entries {
        match node {
            IndexNode::Leaf => {
                let title = naming::title_of(name);
                lines.push(format!("* [{}]({})", title, note_link(ancestors, name)));
            }
            IndexNode::Directory(children) => {
                lines.push(format!("* {name}"));
                let mut path = ancestors.to_vec();
                path.push(name.clone());
                lines.extend(
                    generate_lines(children, &path)
                        .into_iter()
                        .map(|line| format!("{INDENT}{line}")),
                );
            }
        }
    }
    lines
}

/// Root-relative link to a published note.
pub fn note_link(ancestors: &[String], file_name: &str) -> String {
    let segments = ancestors
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(file_name));
    format!("/{}", urls::join_encoded(segments))
}
