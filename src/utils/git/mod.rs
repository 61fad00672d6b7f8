//! Git operations for deploying a build folder.
//!
//! Read-only inspection (repository discovery, remote lookup) goes through
//! `gix`. Staging, committing and the subtree push run the `git` client,
//! since `gix` has no subtree support.

mod client;
mod remote;
mod repo;
mod subtree;

#[cfg(test)]
pub mod test_repo;

pub use client::GitClient;
pub use remote::{pages_url, parse_remote};
pub use repo::{discover_root, ensure_git, remote_url};
pub use subtree::PushTarget;

use anyhow::Result;

/// Version-control operations a deploy run needs.
pub trait Vcs {
    /// Stage every working-tree change (`git add -A`).
    fn stage_all(&self) -> Result<()>;

    /// Whether the index differs from `HEAD`.
    fn has_staged_changes(&self) -> Result<bool>;

    /// Commit the index with `message`.
    fn commit(&self, message: &str) -> Result<()>;

    /// Push the history of `target.prefix` as `target.branch` on `target.remote`.
    fn push_subtree(&self, target: &PushTarget) -> Result<()>;
}
