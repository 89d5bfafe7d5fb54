use clap::{Parser, Subcommand};
use notepub::config::{self, Locations};
use notepub::{output, publish, scan, sidebar};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "notepub")]
#[command(about = "Publish marked notes from a note vault as a documentation site")]
#[command(long_about = "\
Publish marked notes from a note vault as a documentation site

Notes whose file name starts with `P.` and ends with `.md` are published.
Their directory structure is kept, `![[embeds]]` become image links (and the
embedded files are copied), and `[[cross references]]` become site links.

Layout:

  $OBSIDIAN_NOTE_DIR/              # note vault
  ├── P.Welcome.md                 # published
  ├── draft.md                     # private
  ├── assets/diagram.png           # copied only if a published note embeds it
  └── guides/P.Setup.md            # published as guides/P.Setup.md

  $GIT_NOTE_ROOT/                  # project root
  ├── publish.toml                 # optional layout names
  ├── docs_template/               # copied to docs/ on every run
  └── docs/                        # output, rebuilt from scratch every run
      └── _sidebar.md              # generated navigation

Both roots can also be set in a .env file in the working directory.
Run 'notepub gen-config' to print a documented publish.toml.")]
#[command(version)]
struct Cli {
    /// Root of the note vault
    #[arg(long, env = "OBSIDIAN_NOTE_DIR", global = true)]
    note_dir: Option<PathBuf>,

    /// Project root holding the template and output directories
    #[arg(long, env = "GIT_NOTE_ROOT", global = true)]
    project_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rebuild the output directory from the template and the vault (default)
    Build,
    /// List the notes that would be published without writing anything
    Check,
    /// Print the generated sidebar to stdout
    Sidebar,
    /// Print the scanned note index
    Scan {
        /// Print the index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock publish.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let note_dir = require(cli.note_dir, "--note-dir", "OBSIDIAN_NOTE_DIR")?;
            let project_root = require(cli.project_root, "--project-root", "GIT_NOTE_ROOT")?;
            let loc = resolve_locations(&note_dir, &project_root)?;

            println!("==> Publishing {}", loc.note_root.display());
            let report = publish::publish(&loc)?;
            output::print_publish_output(&report);
            println!("==> Build complete: {}", loc.doc_root.display());
        }
        Command::Check => {
            let note_dir = require(cli.note_dir, "--note-dir", "OBSIDIAN_NOTE_DIR")?;
            println!("==> Checking {}", note_dir.display());
            let index = scan::scan(&note_dir)?;
            output::print_scan_output(&index);
        }
        Command::Sidebar => {
            let note_dir = require(cli.note_dir, "--note-dir", "OBSIDIAN_NOTE_DIR")?;
            let index = scan::scan(&note_dir)?;
            println!("{}", sidebar::render(&index));
        }
        Command::Scan { json } => {
            let note_dir = require(cli.note_dir, "--note-dir", "OBSIDIAN_NOTE_DIR")?;
            let index = scan::scan(&note_dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else {
                output::print_scan_output(&index);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// A root that must come from either its flag or its environment variable.
fn require(value: Option<PathBuf>, flag: &str, env: &str) -> Result<PathBuf, String> {
    value.ok_or_else(|| format!("missing {flag} (or set {env})"))
}

/// Load `publish.toml` from the project root and resolve every run path.
fn resolve_locations(
    note_dir: &Path,
    project_root: &Path,
) -> Result<Locations, config::ConfigError> {
    let site_config = config::load_config(project_root)?;
    Ok(Locations::new(note_dir, project_root, &site_config))
}
