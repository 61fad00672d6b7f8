use anyhow::{Context, Result, anyhow};
use gix::Repository;
use std::path::{Path, PathBuf};

/// Make sure the `git` client is reachable on `PATH`.
pub fn ensure_git() -> Result<PathBuf> {
    which::which("git").context("`git` not found on PATH, install git first")
}

/// Open the repository containing `start`
pub fn open_repo(start: &Path) -> Result<Repository> {
    gix::discover(start)
        .with_context(|| format!("Not inside a git repository: {}", start.display()))
}

/// Work tree root of the repository containing `start`
pub fn discover_root(start: &Path) -> Result<PathBuf> {
    let repo = open_repo(start)?;
    get_repo_root(&repo).map(Path::to_path_buf)
}

/// Work tree toplevel, also correct for linked worktrees and `GIT_DIR` setups
pub(crate) fn get_repo_root(repo: &Repository) -> Result<&Path> {
    repo.workdir().ok_or_else(|| {
        anyhow!(
            "Repository at {} is bare, a work tree is required",
            repo.path().display()
        )
    })
}

/// Push URL of a named remote.
pub fn remote_url(root: &Path, remote: &str) -> Result<String> {
    let repo = open_repo(root)?;
    let found = repo
        .find_remote(remote)
        .with_context(|| format!("Remote `{remote}` is not configured"))?;
    let url = found
        .url(gix::remote::Direction::Push)
        .ok_or_else(|| anyhow!("Remote `{remote}` has no url"))?;
    Ok(url.to_bstring().to_string())
}
