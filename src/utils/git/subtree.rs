//! `git subtree` command construction.

use std::fmt;

/// Where the build folder goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushTarget {
    /// `/`-separated folder path relative to the repository root
    pub prefix: String,
    pub remote: String,
    pub branch: String,
    /// Replace the branch history instead of fast-forwarding it
    pub force: bool,
}

impl fmt::Display for PushTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/ -> {}/{}", self.prefix, self.remote, self.branch)
    }
}

impl PushTarget {
    /// `git subtree push --prefix <folder> <remote> <branch>`
    pub(super) fn push_args(&self) -> Vec<&str> {
        vec![
            "subtree",
            "push",
            "--prefix",
            self.prefix.as_str(),
            self.remote.as_str(),
            self.branch.as_str(),
        ]
    }

    /// `git subtree split --prefix <folder>`, printing the split commit
    pub(super) fn split_args(&self) -> Vec<&str> {
        vec!["subtree", "split", "--prefix", self.prefix.as_str()]
    }

    /// `git push --force <remote> <commit>:refs/heads/<branch>`
    pub(super) fn force_push_args(&self, commit: &str) -> Vec<String> {
        vec![
            "push".to_string(),
            "--force".to_string(),
            self.remote.clone(),
            format!("{commit}:refs/heads/{}", self.branch),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(force: bool) -> PushTarget {
        PushTarget {
            prefix: "dist".into(),
            remote: "origin".into(),
            branch: "gh-pages".into(),
            force,
        }
    }

    #[test]
    fn test_push_args_scoped_to_prefix_and_branch() {
        assert_eq!(
            target(false).push_args(),
            ["subtree", "push", "--prefix", "dist", "origin", "gh-pages"]
        );
    }

    #[test]
    fn test_force_push_args() {
        let target = target(true);
        assert_eq!(target.split_args(), ["subtree", "split", "--prefix", "dist"]);
        assert_eq!(
            target.force_push_args("abc123"),
            ["push", "--force", "origin", "abc123:refs/heads/gh-pages"]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(target(false).to_string(), "dist/ -> origin/gh-pages");
    }
}
