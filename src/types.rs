//! The sidebar index shared by every stage.
//!
//! The scanner builds it, the sidebar generator renders it and the publisher
//! walks it to copy notes. Nothing mutates it after the scan.

use serde::Serialize;
use std::collections::BTreeMap;

/// One entry of the index: a directory holding more entries, or a
/// publishable note.
///
/// Children live in a `BTreeMap` so iteration is always lexicographic,
/// independent of the order the filesystem returned them in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexNode {
    Directory(BTreeMap<String, IndexNode>),
    Leaf,
}

impl IndexNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self, IndexNode::Leaf)
    }
}

/// Root of the index: segment name → node.
///
/// An empty index means the note root holds nothing publishable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SidebarIndex {
    pub entries: BTreeMap<String, IndexNode>,
}

impl SidebarIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert a note at `dirs/file_name`, creating intermediate directories.
    ///
    /// Re-inserting an existing note is a no-op. A note sitting where one of
    /// `dirs` needs a directory is replaced by that directory.
    pub fn insert(&mut self, dirs: &[String], file_name: &str) {
        let mut level = &mut self.entries;
        for dir in dirs {
            let node = level.entry(dir.clone()).or_insert(IndexNode::Leaf);
            if node.is_leaf() {
                *node = IndexNode::Directory(BTreeMap::new());
            }
            let IndexNode::Directory(children) = node else {
                unreachable!("leaf was just replaced by a directory");
            };
            level = children;
        }
        level.insert(file_name.to_string(), IndexNode::Leaf);
    }

    /// Total number of notes in the index.
    pub fn note_count(&self) -> usize {
        fn count(entries: &BTreeMap<String, IndexNode>) -> usize {
            entries
                .values()
                .map(|node| match node {
                    IndexNode::Leaf => 1,
                    IndexNode::Directory(children) => count(children),
                })
                .sum()
        }
        count(&self.entries)
    }

    /// Every note as `(ancestor directories, file name)`, in rendering order.
    pub fn notes(&self) -> Vec<(Vec<String>, String)> {
        fn collect(
            entries: &BTreeMap<String, IndexNode>,
            ancestors: &mut Vec<String>,
            out: &mut Vec<(Vec<String>, String)>,
        ) {
            for (name, node) in entries {
                match node {
                    IndexNode::Leaf => out.push((ancestors.clone(), name.clone())),
                    IndexNode::Directory(children) => {
                        ancestors.push(name.clone());
                        collect(children, ancestors, out);
                        ancestors.pop();
                    }
                }
            }
        }
        let mut out = Vec::new();
        collect(&self.entries, &mut Vec::new(), &mut out);
        out
    }
}
