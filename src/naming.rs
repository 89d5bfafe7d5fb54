//! Filename conventions for publishable notes.
//!
//! A note is published when its file name starts with `P.` and ends with
//! `.md`. Both checks are exact and case-sensitive:
//!
//! - `P.Rust Notes.md` → published, title "P.Rust Notes"
//! - `p.Rust Notes.md` → skipped (lowercase marker)
//! - `P.Diagram.png` → skipped (not markdown)
//! - `draft.md` → skipped (no marker)
//!
//! ## Titles
//!
//! The title of a note is its file name with the last extension removed. The
//! marker is kept, so `P.Setup.md` is titled "P.Setup" both in the sidebar and
//! in the heading inserted at the top of the published page.

/// Prefix marking a note for publication.
pub const PUBLISH_PREFIX: &str = "P.";

/// Extension every publishable note carries.
pub const NOTE_EXTENSION: &str = ".md";

/// Whether a file name matches the publish convention.
pub fn is_publishable(file_name: &str) -> bool {
    file_name.starts_with(PUBLISH_PREFIX) && file_name.ends_with(NOTE_EXTENSION)
}

/// Display title: the file name without its last extension.
///
/// Names without a dot, or whose only dot is the leading character
/// (`.hidden`), are returned unchanged.
pub fn title_of(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 && file_name[..pos].chars().any(|c| c != '.') => &file_name[..pos],
        _ => file_name,
    }
}
