//! Throwaway repositories for tests that need a real `git`.

use crate::utils::exec::Cmd;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tempfile::TempDir;

/// Whether `git` and its `subtree` extension are installed.
///
/// Tests return early when this is false.
pub fn subtree_available() -> bool {
    let Ok(output) = Cmd::new("git").arg("--exec-path").run() else {
        return false;
    };
    let exec_path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Path::new(&exec_path).join("git-subtree").exists()
}

/// Run `git` in `dir`, returning trimmed stdout.
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Cmd::new("git").args(args).cwd(dir).run().unwrap();
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// A work tree at `<tmp>/site`, optionally with a bare `origin` at `<tmp>/remote.git`.
pub struct TestRepo {
    dir: TempDir,
    pub work: PathBuf,
}

impl TestRepo {
    /// Work tree with `README.md` and `dist/index.html`, and a bare `origin`.
    pub fn new() -> Self {
        let repo = Self::without_remote();
        git(repo.dir.path(), &["init", "--quiet", "--bare", "remote.git"]);
        let remote = repo.remote();
        git(&repo.work, &["remote", "add", "origin", remote.to_str().unwrap()]);
        repo
    }

    /// Same work tree, no remotes configured.
    pub fn without_remote() -> Self {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("site");
        fs::create_dir_all(&work).unwrap();

        git(&work, &["init", "--quiet"]);
        git(&work, &["config", "user.name", "Site Bot"]);
        git(&work, &["config", "user.email", "bot@example.com"]);
        git(&work, &["config", "commit.gpgsign", "false"]);

        fs::write(work.join("README.md"), "# site\n").unwrap();
        let repo = Self { dir, work };
        repo.build_output("");
        repo
    }

    /// Write `<sub>/dist/index.html` and return `<work>/<sub>`.
    pub fn build_output(&self, sub: &str) -> PathBuf {
        let root = self.work.join(sub);
        fs::create_dir_all(root.join("dist")).unwrap();
        fs::write(root.join("dist/index.html"), "<h1>hi</h1>\n").unwrap();
        root
    }

    pub fn remote(&self) -> PathBuf {
        self.dir.path().join("remote.git")
    }

    /// Top-level entries of `branch` on the bare remote.
    pub fn published_files(&self, branch: &str) -> String {
        git(&self.remote(), &["ls-tree", "--name-only", branch])
    }

    /// Subject line of the latest commit in the work tree.
    pub fn last_subject(&self) -> String {
        git(&self.work, &["log", "-1", "--format=%s"])
    }
}
