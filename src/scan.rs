//! Note-tree scanning.
//!
//! Stage 1 of the publish pipeline. Walks the note root and records every
//! publishable note in a [`SidebarIndex`], keyed by its directory path.
//!
//! ## Example
//!
//! ```text
//! notes/                          # Note root
//! ├── P.Welcome.md                # → top-level leaf
//! ├── draft.md                    # no marker, ignored
//! ├── assets/
//! │   └── diagram.png             # not a note, ignored (copied only if embedded)
//! └── guides/
//!     ├── P.Setup.md              # → guides/P.Setup.md
//!     └── scratch/
//!         └── todo.md             # ignored; `scratch` never enters the index
//! ```
//!
//! Directories only appear in the index when they contain at least one
//! publishable note somewhere below them. Entries inside a directory are
//! visited in sorted order, though rendering re-sorts anyway.
//!
//! Any filesystem error aborts the scan.

use crate::naming;
use crate::types::SidebarIndex;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Path is not valid UTF-8: {0}")]
    NonUtf8Name(PathBuf),
}

/// Build the sidebar index for every publishable note under `root`.
pub fn scan(root: &Path) -> Result<SidebarIndex, ScanError> {
    let mut index = SidebarIndex::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1);

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_dir() || !entry.path().is_file() {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if !naming::is_publishable(&file_name) {
            continue;
        }
        if entry.file_name().to_str().is_none() {
            return Err(ScanError::NonUtf8Name(entry.path().to_path_buf()));
        }

        let dirs = relative_dirs(entry.path(), root)?;
        log::debug!("found note {}", entry.path().display());
        index.insert(&dirs, &file_name);
    }

    log::info!(
        "scanned {}: {} publishable notes",
        root.display(),
        index.note_count()
    );
    Ok(index)
}

/// Directory segments between `root` and the file at `path`.
fn relative_dirs(path: &Path, root: &Path) -> Result<Vec<String>, ScanError> {
    let rel = path.strip_prefix(root).unwrap_or(path);
    let Some(parent) = rel.parent() else {
        return Ok(Vec::new());
    };
    parent
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .map(str::to_string)
                .ok_or_else(|| ScanError::NonUtf8Name(path.to_path_buf()))
        })
        .collect()
}
