//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

/// Config file looked up when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "sitepush.toml";

/// Publish a static site build folder to a hosting branch.
///
/// Stages and commits pending changes, then pushes the build folder as the
/// root of the hosting branch with `git subtree push`.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (searched upward from the current directory)
    #[arg(short = 'C', long, default_value = DEFAULT_CONFIG, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Hosting branch to push to (e.g., gh-pages)
    #[arg(short, long)]
    pub branch: Option<String>,

    /// Build output folder, relative to the project root
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub folder: Option<PathBuf>,

    /// Remote to push to
    #[arg(short, long)]
    pub remote: Option<String>,

    /// Commit message for pending changes
    #[arg(short, long)]
    pub message: Option<String>,

    /// Force push, overwriting the hosting branch history
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub force: Option<bool>,

    /// Destination URL shown after a successful deploy
    #[arg(short = 'U', long, value_hint = clap::ValueHint::Url)]
    pub url: Option<String>,

    /// Skip the push when the commit step fails
    #[arg(long)]
    pub abort_on_commit_error: bool,

    /// Print the git commands without running them
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Whether `--config` was left at its default name.
    pub fn uses_default_config(&self) -> bool {
        self.config.as_os_str() == DEFAULT_CONFIG
    }
}
