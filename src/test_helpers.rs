//! Shared test utilities.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let index = scan(&tmp.path().join("notes")).unwrap();
//! assert_eq!(leaf_paths(&index), vec!["P.Welcome.md", "guides/P.Cross References.md"]);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use tempfile::TempDir;
use walkdir::WalkDir;

use crate::types::SidebarIndex;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/` (the `notes/` vault and the `project/` root) to a temp
/// directory and return it.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Index and tree extractors
// =========================================================================

/// Every note in the index as a `/`-joined relative path, in sidebar order.
pub fn leaf_paths(index: &SidebarIndex) -> Vec<String> {
    index
        .notes()
        .into_iter()
        .map(|(mut dirs, file)| {
            dirs.push(file);
            dirs.join("/")
        })
        .collect()
}

/// Read every file under `root` into a map of relative path → bytes.
///
/// Two runs that produce the same map produced byte-identical trees.
pub fn read_tree(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let rel = e.path().strip_prefix(root).unwrap();
            let key = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (key, std::fs::read(e.path()).unwrap())
        })
        .collect()
}
