//! Publish layout configuration.
//!
//! Where things live comes from two places:
//!
//! - **Environment** (or the equivalent CLI flags): the note root and the
//!   project root. See [`Locations`].
//! - **`publish.toml`** in the project root (optional): the names of the
//!   template directory, the output directory and the sidebar file.
//!
//! ```text
//! project/                    # GIT_NOTE_ROOT
//! ├── publish.toml            # optional
//! ├── docs_template/          # copied verbatim to docs/ on every run
//! │   └── index.html
//! └── docs/                   # output, deleted and rebuilt on every run
//!     ├── _sidebar.md
//!     └── ...
//! ```
//!
//! ## Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//! template_dir = "docs_template"
//! output_dir = "docs"
//! sidebar_file = "_sidebar.md"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// File name of the optional layout config inside the project root.
pub const CONFIG_FILE: &str = "publish.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Names of the fixed-layout entries inside the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublishConfig {
    /// Directory copied verbatim into the output before notes are added.
    pub template_dir: String,
    /// Directory that receives the published site. Replaced on every run.
    pub output_dir: String,
    /// Navigation file written at the top of the output directory.
    pub sidebar_file: String,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            template_dir: "docs_template".to_string(),
            output_dir: "docs".to_string(),
            sidebar_file: "_sidebar.md".to_string(),
        }
    }
}

impl PublishConfig {
    /// Every name must be one plain path component, and the template must not
    /// be the output (the output is deleted before the template is copied).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("template_dir", &self.template_dir),
            ("output_dir", &self.output_dir),
            ("sidebar_file", &self.sidebar_file),
        ] {
            if !is_plain_name(value) {
                return Err(ConfigError::Validation(format!(
                    "{key} must be a single file or directory name, got {value:?}"
                )));
            }
        }
        if self.template_dir == self.output_dir {
            return Err(ConfigError::Validation(
                "template_dir and output_dir must differ".into(),
            ));
        }
        Ok(())
    }
}

fn is_plain_name(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    ) && !name.contains(['/', '\\'])
}

/// Load `publish.toml` from the project root, or defaults if it is absent.
pub fn load_config(project_root: &Path) -> Result<PublishConfig, ConfigError> {
    let path = project_root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(PublishConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: PublishConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Resolved absolute-or-relative paths for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locations {
    /// Root of the note vault; every note and attachment path is relative to it.
    pub note_root: PathBuf,
    pub template_dir: PathBuf,
    pub doc_root: PathBuf,
    pub sidebar_path: PathBuf,
}

impl Locations {
    pub fn new(note_root: &Path, project_root: &Path, config: &PublishConfig) -> Self {
        let doc_root = project_root.join(&config.output_dir);
        Self {
            note_root: note_root.to_path_buf(),
            template_dir: project_root.join(&config.template_dir),
            sidebar_path: doc_root.join(&config.sidebar_file),
            doc_root,
        }
    }
}

/// Returns a fully-commented stock `publish.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# notepub layout configuration
# ============================
#
# Place this file at the project root (GIT_NOTE_ROOT) as publish.toml.
# Every key is optional; the values below are the defaults.
# Each value must be a single name inside the project root, not a path.

# Directory whose contents are copied verbatim into the output before
# any note is written (index.html, theme files, ...). Must exist.
template_dir = "docs_template"

# Directory receiving the published site. It is deleted and rebuilt
# from the template on every run - do not keep hand-written files here.
output_dir = "docs"

# Navigation list written at the top of the output directory.
sidebar_file = "_sidebar.md"
"##
}
