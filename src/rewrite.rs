//! Note content rewriting.
//!
//! Converts the vault's link syntax into plain markdown links that work on the
//! published site. Two passes run over the raw text, always in this order:
//!
//! 1. **Embeds** `![[assets/x.png]]` → `![](../../assets/x.png)`. The target
//!    walks back to the output root with one `../` per directory the note sits
//!    in, then follows the embed path; every segment is percent-encoded on its
//!    own. The embedded file is copied from the note root to the same relative
//!    path under the output root. Embed paths must stay inside the note
//!    root: absolute paths and `..` segments are rejected, as is an embed
//!    whose source and destination resolve to the same file.
//! 2. **Cross-references** `[[Some Note#Section]]` →
//!    `[Some Note#Section](/Some%20Note?id=Section)`. The display text is the
//!    raw target, HTML-escaped. The target is split on its last `#`; the page
//!    part is encoded as one root-relative path and the anchor, when present,
//!    becomes an `?id=` query.
//!
//! The embed pattern is the cross-reference pattern with a leading `!`, so the
//! embed pass must consume its matches first. Its replacements contain no
//! `[[`, which keeps the second pass from seeing them again.
//!
//! Text that does not match either pattern is left exactly as written; there
//! is no check that a cross-reference points at a published note.
//!
//! Finally a `# <title>` heading line is put in front of the body.

use crate::naming;
use crate::urls;
use regex::{Captures, Regex};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static EMBED_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"!\[\[(.*?)\]\]").unwrap());

static CROSS_REF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[(.*?)\]\]").unwrap());

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Failed to copy attachment {}: {source}", path.display())]
    AttachmentCopy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Attachment path {0:?} leaves the note root")]
    UnsafeAttachmentPath(String),
    #[error("Attachment {} would be copied onto itself", path.display())]
    SameFile { path: PathBuf },
}

/// A rewritten note and the attachments copied while producing it.
#[derive(Debug, Clone, PartialEq)]
pub struct RewrittenNote {
    pub content: String,
    /// Embed paths as written in the note, in order of appearance.
    /// Repeated embeds are listed (and copied) once per occurrence.
    pub attachments: Vec<String>,
}

/// Rewrites notes from one vault into one output tree.
#[derive(Debug, Clone)]
pub struct Rewriter {
    note_root: PathBuf,
    doc_root: PathBuf,
}

impl Rewriter {
    pub fn new(note_root: impl Into<PathBuf>, doc_root: impl Into<PathBuf>) -> Self {
        Self {
            note_root: note_root.into(),
            doc_root: doc_root.into(),
        }
    }

    /// Rewrite the note `file_name` sitting in the `ancestors` directories.
    ///
    /// Attachments are copied as they are found; a missing attachment aborts
    /// the rewrite with whatever was copied before it left in place.
    pub fn rewrite(
        &self,
        file_name: &str,
        content: &str,
        ancestors: &[String],
    ) -> Result<RewrittenNote, RewriteError> {
        let mut attachments = Vec::new();

        let body = replace_all(&EMBED_RE, content, |caps| -> Result<String, RewriteError> {
            let path = &caps[1];
            self.copy_attachment(path)?;
            attachments.push(path.to_string());
            Ok(format!("![]({})", attachment_link(ancestors.len(), path)))
        })?;

        let body = CROSS_REF_RE.replace_all(&body, |caps: &Captures| cross_ref_link(&caps[1]));

        Ok(RewrittenNote {
            content: format!("# {}\n{}", naming::title_of(file_name), body),
            attachments,
        })
    }

    fn copy_attachment(&self, rel: &str) -> Result<(), RewriteError> {
        if !is_contained(rel) {
            return Err(RewriteError::UnsafeAttachmentPath(rel.to_string()));
        }
        let src = self.note_root.join(rel);
        let dst = self.doc_root.join(rel);
        if let (Ok(a), Ok(b)) = (src.canonicalize(), dst.canonicalize()) {
            if a == b {
                return Err(RewriteError::SameFile { path: src });
            }
        }
        let copy = || -> std::io::Result<()> {
            if let Some(parent) = dst.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(&src, &dst)?;
            Ok(())
        };
        copy().map_err(|source| RewriteError::AttachmentCopy { path: src.clone(), source })?;
        log::debug!("copied attachment {rel}");
        Ok(())
    }
}

/// Whether `rel` names something below the root it is joined onto.
fn is_contained(rel: &str) -> bool {
    Path::new(rel)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Like `Regex::replace_all`, but the replacement may fail.
fn replace_all<E>(
    re: &Regex,
    text: &str,
    mut replace: impl FnMut(&Captures) -> Result<String, E>,
) -> Result<String, E> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in re.captures_iter(text) {
        let whole = caps.get_match();
        out.push_str(&text[last..whole.start()]);
        out.push_str(&replace(&caps)?);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    Ok(out)
}

/// Link from a note `depth` directories deep to an attachment at `path`.
pub fn attachment_link(depth: usize, path: &str) -> String {
    let relative = format!("{}{}", "../".repeat(depth), path);
    urls::join_encoded(relative.split('/'))
}

/// Markdown link for a cross-reference target such as `Some Note#Section`.
pub fn cross_ref_link(target: &str) -> String {
    let text = urls::escape_html(target);
    let (page, anchor) = match target.rsplit_once('#') {
        Some((page, anchor)) => (page, Some(anchor)),
        None => (target, None),
    };
    let mut url = urls::encode_path(&format!("/{page}"));
    if let Some(anchor) = anchor {
        url.push_str("?id=");
        url.push_str(&urls::encode_path(anchor));
    }
    format!("[{text}]({url})")
}
