//! # notepub
//!
//! Publishes the marked notes of a personal note vault as a static
//! documentation site (a docsify-style tree of markdown files plus a
//! `_sidebar.md` navigation list).
//!
//! A note is published when its file name starts with `P.` and ends with
//! `.md`. Everything else in the vault stays private, except attachments that
//! a published note embeds.
//!
//! # Pipeline
//!
//! ```text
//! 1. Scan      notes/   →  SidebarIndex          (which notes, where)
//! 2. Sidebar   index    →  _sidebar.md           (nested link list)
//! 3. Publish   index    →  docs/                 (template + rewritten notes + attachments)
//! ```
//!
//! The publish stage drives the whole run: it resets the output from the
//! template, scans, writes the sidebar, then rewrites every note with
//! [`rewrite::Rewriter`].
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the note root and builds the [`types::SidebarIndex`] |
//! | [`sidebar`] | Renders the index as the nested navigation list |
//! | [`rewrite`] | Rewrites embeds and cross-references, copies attachments |
//! | [`publish`] | Runs the full pipeline into the output directory |
//! | [`config`] | Run locations and the optional `publish.toml` |
//! | [`types`] | The index type shared by all stages |
//! | [`naming`] | The `P.` / `.md` publish convention and note titles |
//! | [`urls`] | Percent-encoding and display-text escaping for links |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Rebuild, Never Update
//!
//! The output directory is deleted and rebuilt on every run. There is no
//! state carried between runs, so two runs over the same vault produce
//! byte-identical trees and a removed note can never linger.
//!
//! ## Explicit Roots
//!
//! Every stage takes the note root and output root as arguments. Nothing
//! changes the process working directory, so the library can be driven from
//! tests against temporary directories.
//!
//! ## Two-Pass Link Rewriting
//!
//! Embeds (`![[...]]`) are rewritten before cross-references (`[[...]]`).
//! The embed syntax contains the cross-reference syntax, so reversing the
//! order would turn every embed into a broken page link.

pub mod config;
pub mod naming;
pub mod output;
pub mod publish;
pub mod rewrite;
pub mod scan;
pub mod sidebar;
pub mod types;
pub mod urls;

#[cfg(test)]
pub(crate) mod test_helpers;
