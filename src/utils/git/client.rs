use super::{PushTarget, Vcs};
use crate::{
    log,
    utils::exec::{Cmd, SILENT_FILTER, SUBTREE_FILTER},
};
use anyhow::{Result, bail};
use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
};

/// [`Vcs`] backed by the `git` command-line client.
pub struct GitClient {
    root: PathBuf,
    dry_run: bool,
    pty: bool,
}

impl GitClient {
    /// Client operating on the work tree at `root`.
    ///
    /// Pushes run under a PTY when stdin is a terminal, so credential
    /// prompts reach the user.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            dry_run: false,
            pty: std::io::stdin().is_terminal(),
        }
    }

    /// Log mutating commands instead of running them.
    pub fn dry_run(mut self, enable: bool) -> Self {
        self.dry_run = enable;
        self
    }

    fn git(&self) -> Cmd {
        Cmd::new("git").cwd(&self.root)
    }

    /// Run a command that changes the repository or the remote.
    fn mutate(&self, cmd: Cmd) -> Result<Option<String>> {
        if self.dry_run {
            log!("dry-run"; "{cmd}");
            return Ok(None);
        }
        let output = cmd.run()?;
        Ok(Some(String::from_utf8_lossy(&output.stdout).trim().to_string()))
    }

    /// Short id of `HEAD`, `None` when it cannot be read.
    ///
    /// Only used for logging, a commit that went through stays committed.
    fn head_id(&self) -> Option<String> {
        let output = self
            .git()
            .args(["rev-parse", "--short", "HEAD"])
            .filter(&SILENT_FILTER)
            .run()
            .ok()?;
        let id = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!id.is_empty()).then_some(id)
    }
}

impl Vcs for GitClient {
    fn stage_all(&self) -> Result<()> {
        self.mutate(self.git().args(["add", "-A"]))?;
        Ok(())
    }

    fn has_staged_changes(&self) -> Result<bool> {
        if self.dry_run {
            // nothing was staged, so look at the whole work tree instead
            let output = self.git().args(["status", "--porcelain"]).run()?;
            return Ok(!output.stdout.is_empty());
        }

        let status = self.git().args(["diff", "--cached", "--quiet"]).status()?;
        match status.code() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => bail!("`git diff --cached` failed with {status}"),
        }
    }

    fn commit(&self, message: &str) -> Result<()> {
        if message.trim().is_empty() {
            bail!("Commit message cannot be empty");
        }
        let cmd = self.git().args(["commit", "--quiet", "-m"]).arg(message).filter(&SILENT_FILTER);
        if self.mutate(cmd)?.is_some()
            && let Some(id) = self.head_id()
        {
            log!("git"; "commit {id}");
        }
        Ok(())
    }

    fn push_subtree(&self, target: &PushTarget) -> Result<()> {
        if !target.force {
            let cmd = self
                .git()
                .args(target.push_args())
                .pty(self.pty)
                .filter(&SUBTREE_FILTER);
            self.mutate(cmd)?;
            return Ok(());
        }

        let split = self.git().args(target.split_args()).filter(&SILENT_FILTER);
        let commit = if self.dry_run {
            log!("dry-run"; "{split}");
            "<split>".to_string()
        } else {
            let output = split.run()?;
            let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if commit.is_empty() {
                bail!("`git subtree split` produced no commit for `{}`", target.prefix);
            }
            commit
        };

        let cmd = self
            .git()
            .args(target.force_push_args(&commit))
            .pty(self.pty)
            .filter(&SUBTREE_FILTER);
        self.mutate(cmd)?;
        Ok(())
    }
}
