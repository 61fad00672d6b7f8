//! Deploy the build folder to its hosting branch.
//!
//! A run is three sequential steps:
//!
//! 1. stage everything and commit it (an empty changeset is fine)
//! 2. `git subtree push` the folder as the hosting branch
//! 3. report the push result
//!
//! Only the push decides whether the run succeeded.

use crate::{
    config::{CommitErrorPolicy, DeployConfig, ProjectConfig},
    core::{Step, set_step},
    debug, log, logger,
    utils::git::{self, GitClient, PushTarget, Vcs},
};
use anyhow::Result;

/// Shown when no destination can be derived from the remote.
pub const PLACEHOLDER_URL: &str = "https://[username].github.io/[repository]/";

// ============================================================================
// Outcomes
// ============================================================================

/// Result of the stage + commit step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed,
    NothingToCommit,
    Failed(String),
}

/// Result of the subtree push step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushOutcome {
    Pushed,
    Failed(String),
    /// Not attempted because the commit failed under `on_commit_error = "abort"`
    Skipped,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployReport {
    pub target: PushTarget,
    pub commit: CommitOutcome,
    pub push: PushOutcome,
}

impl DeployReport {
    /// Whether the hosting branch was updated.
    pub fn succeeded(&self) -> bool {
        self.push == PushOutcome::Pushed
    }
}

/// Where the deployed site can be visited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Resolved(String),
    /// Identity unknown, the user substitutes the bracketed parts
    Placeholder,
}

impl Destination {
    /// Explicit url first, then a GitHub Pages address derived from the remote.
    pub fn resolve(url: Option<&str>, remote_url: Option<&str>) -> Self {
        if let Some(url) = url {
            return Self::Resolved(url.to_string());
        }
        remote_url
            .and_then(git::parse_remote)
            .and_then(|identity| git::pages_url(&identity))
            .map_or(Self::Placeholder, Self::Resolved)
    }
}

// ============================================================================
// Runner
// ============================================================================

/// Deploy the configured folder: preflight, commit, push, report.
pub fn deploy_site(config: &ProjectConfig) -> Result<DeployReport> {
    let root = config.get_root();
    let deploy = &config.deploy;

    if !config.config_path.as_os_str().is_empty() {
        debug!("deploy"; "using {}", config.config_path.display());
    }
    git::ensure_git()?;
    let toplevel = git::discover_root(root)?;
    let prefix = deploy.subtree_prefix(root, &toplevel)?;
    debug!("deploy"; "work tree {}, prefix {prefix}", toplevel.display());

    // a missing remote surfaces as a push failure
    let remote_url = match git::remote_url(&toplevel, &deploy.remote) {
        Ok(url) => {
            debug!("deploy"; "remote `{}` is {url}", deploy.remote);
            Some(url)
        }
        Err(e) => {
            debug!("deploy"; "{e:#}");
            None
        }
    };

    let destination = Destination::resolve(deploy.url.as_deref(), remote_url.as_deref());
    let vcs = GitClient::new(&toplevel).dry_run(config.dry_run);

    let report = run(&vcs, deploy, &prefix);
    set_step(Step::Report);
    if config.dry_run {
        log!("dry-run"; "no commit or push was performed");
    }
    print_report(&report, &destination);
    Ok(report)
}

/// Run the commit and push steps against `vcs`.
///
/// `prefix` is the folder relative to the work tree toplevel.
pub fn run(vcs: &impl Vcs, deploy: &DeployConfig, prefix: &str) -> DeployReport {
    let target = PushTarget {
        prefix: prefix.to_string(),
        remote: deploy.remote.clone(),
        branch: deploy.branch.clone(),
        force: deploy.force,
    };

    let commit = commit_changes(vcs, &deploy.message);
    let push = match (&commit, deploy.on_commit_error) {
        (CommitOutcome::Failed(_), CommitErrorPolicy::Abort) => {
            log!("deploy"; "commit failed, skipping push");
            PushOutcome::Skipped
        }
        _ => push_folder(vcs, &target),
    };

    DeployReport {
        target,
        commit,
        push,
    }
}

/// Stage everything and commit it.
fn commit_changes(vcs: &impl Vcs, message: &str) -> CommitOutcome {
    set_step(Step::Commit);
    let committed = vcs.stage_all().and_then(|()| {
        if !vcs.has_staged_changes()? {
            return Ok(false);
        }
        vcs.commit(message)?;
        Ok(true)
    });

    match committed {
        Ok(true) => CommitOutcome::Committed,
        Ok(false) => {
            log!("git"; "nothing to commit, working tree clean");
            CommitOutcome::NothingToCommit
        }
        Err(e) => {
            log!("error"; "commit failed: {e:#}");
            CommitOutcome::Failed(format!("{e:#}"))
        }
    }
}

/// Push the folder history as the hosting branch.
fn push_folder(vcs: &impl Vcs, target: &PushTarget) -> PushOutcome {
    set_step(Step::Push);
    log!("deploy"; "pushing {target}");
    match vcs.push_subtree(target) {
        Ok(()) => PushOutcome::Pushed,
        Err(e) => PushOutcome::Failed(format!("{e:#}")),
    }
}

// ============================================================================
// Report
// ============================================================================

/// Final message of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Banner {
    Success(String),
    Failure { summary: String, detail: String },
}

impl Banner {
    pub fn new(report: &DeployReport, destination: &Destination) -> Self {
        let target = &report.target;
        match &report.push {
            PushOutcome::Pushed => Self::Success(success_message(target, destination)),
            PushOutcome::Failed(reason) => Self::Failure {
                summary: format!(
                    "deployment failed, could not push {target} (check that remote `{}` exists and accepts your push with `git remote -v`)",
                    target.remote
                ),
                detail: reason.clone(),
            },
            PushOutcome::Skipped => Self::Failure {
                summary: "deployment skipped, the commit step failed".to_string(),
                detail: match &report.commit {
                    CommitOutcome::Failed(reason) => reason.clone(),
                    _ => String::new(),
                },
            },
        }
    }

    pub fn print(&self) {
        match self {
            Self::Success(message) => logger::status_success(message),
            Self::Failure { summary, detail } => logger::status_error(summary, detail),
        }
    }
}

fn success_message(target: &PushTarget, destination: &Destination) -> String {
    match destination {
        Destination::Resolved(url) => {
            format!("deployed to `{}`, visit {url}", target.branch)
        }
        Destination::Placeholder => format!(
            "deployed to `{}`, visit {PLACEHOLDER_URL} (replace the bracketed parts with your user and repository)",
            target.branch
        ),
    }
}

fn print_report(report: &DeployReport, destination: &Destination) {
    if let CommitOutcome::Failed(_) = report.commit
        && report.succeeded()
    {
        logger::status_warning("pushed, but pending changes were not committed");
    }
    Banner::new(report, destination).print();
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::git::test_repo::{TestRepo, subtree_available};
    use anyhow::bail;
    use std::cell::{Cell, RefCell};

    /// In-memory repository recording every call.
    #[derive(Default)]
    struct FakeVcs {
        calls: RefCell<Vec<String>>,
        dirty: Cell<bool>,
        staged: Cell<bool>,
        fail_stage: bool,
        fail_commit: bool,
        fail_push: bool,
    }

    impl FakeVcs {
        fn dirty() -> Self {
            let vcs = Self::default();
            vcs.dirty.set(true);
            vcs
        }

        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }

        fn pushes(&self) -> Vec<String> {
            self.calls()
                .into_iter()
                .filter(|c| c.starts_with("push"))
                .collect()
        }
    }

    impl Vcs for FakeVcs {
        fn stage_all(&self) -> Result<()> {
            self.calls.borrow_mut().push("stage".into());
            if self.fail_stage {
                bail!("index.lock exists");
            }
            self.staged.set(self.dirty.get());
            Ok(())
        }

        fn has_staged_changes(&self) -> Result<bool> {
            Ok(self.staged.get())
        }

        fn commit(&self, message: &str) -> Result<()> {
            self.calls.borrow_mut().push(format!("commit {message}"));
            if self.fail_commit {
                bail!("pre-commit hook rejected the commit");
            }
            self.dirty.set(false);
            self.staged.set(false);
            Ok(())
        }

        fn push_subtree(&self, target: &PushTarget) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("push {} {} {}", target.prefix, target.remote, target.branch));
            if self.fail_push {
                bail!("fatal: 'origin' does not appear to be a git repository");
            }
            Ok(())
        }
    }

    fn github() -> Destination {
        Destination::resolve(None, Some("git@github.com:alice/blog.git"))
    }

    #[test]
    fn test_commit_then_push() {
        let vcs = FakeVcs::dirty();
        let report = run(&vcs, &DeployConfig::default(), "dist");

        assert_eq!(report.commit, CommitOutcome::Committed);
        assert_eq!(report.push, PushOutcome::Pushed);
        assert!(report.succeeded());
        assert_eq!(
            vcs.calls(),
            ["stage", "commit Deploy site", "push dist origin gh-pages"]
        );
    }

    #[test]
    fn test_push_success_prints_only_success_banner() {
        let report = run(&FakeVcs::dirty(), &DeployConfig::default(), "dist");
        let banner = Banner::new(&report, &github());

        let Banner::Success(message) = banner else {
            panic!("expected success banner, got {banner:?}");
        };
        assert!(message.contains("https://alice.github.io/blog/"));
        assert!(!message.contains("failed"));
    }

    #[test]
    fn test_push_failure_prints_only_failure_banner() {
        let vcs = FakeVcs {
            fail_push: true,
            ..FakeVcs::dirty()
        };
        let report = run(&vcs, &DeployConfig::default(), "dist");
        assert!(!report.succeeded());

        let banner = Banner::new(&report, &github());
        let Banner::Failure { summary, detail } = banner else {
            panic!("expected failure banner, got {banner:?}");
        };
        assert!(summary.contains("remote `origin`"));
        assert!(detail.contains("does not appear to be a git repository"));
        assert!(!summary.contains("deployed to"));
    }

    #[test]
    fn test_commit_outcome_never_blocks_push() {
        let cases = [
            (FakeVcs::dirty(), CommitOutcome::Committed),
            (FakeVcs::default(), CommitOutcome::NothingToCommit),
            (
                FakeVcs {
                    fail_commit: true,
                    ..FakeVcs::dirty()
                },
                CommitOutcome::Failed("pre-commit hook rejected the commit".into()),
            ),
            (
                FakeVcs {
                    fail_stage: true,
                    ..FakeVcs::dirty()
                },
                CommitOutcome::Failed("index.lock exists".into()),
            ),
        ];

        for (vcs, expected) in cases {
            let report = run(&vcs, &DeployConfig::default(), "dist");
            assert_eq!(report.commit, expected);
            assert_eq!(report.push, PushOutcome::Pushed);
            assert_eq!(vcs.pushes().len(), 1);
        }
    }

    #[test]
    fn test_abort_policy_skips_push_on_commit_failure() {
        let deploy = DeployConfig {
            on_commit_error: CommitErrorPolicy::Abort,
            ..Default::default()
        };
        let vcs = FakeVcs {
            fail_commit: true,
            ..FakeVcs::dirty()
        };
        let report = run(&vcs, &deploy, "dist");

        assert_eq!(report.push, PushOutcome::Skipped);
        assert!(vcs.pushes().is_empty());
        assert!(!report.succeeded());
        let Banner::Failure { detail, .. } = Banner::new(&report, &github()) else {
            panic!("expected failure banner");
        };
        assert!(detail.contains("pre-commit hook"));
    }

    #[test]
    fn test_abort_policy_still_pushes_when_nothing_to_commit() {
        let deploy = DeployConfig {
            on_commit_error: CommitErrorPolicy::Abort,
            ..Default::default()
        };
        let vcs = FakeVcs::default();
        let report = run(&vcs, &deploy, "dist");

        assert_eq!(report.commit, CommitOutcome::NothingToCommit);
        assert_eq!(report.push, PushOutcome::Pushed);
    }

    #[test]
    fn test_second_run_has_nothing_to_commit() {
        let vcs = FakeVcs::dirty();
        let first = run(&vcs, &DeployConfig::default(), "dist");
        let second = run(&vcs, &DeployConfig::default(), "dist");

        assert_eq!(first.commit, CommitOutcome::Committed);
        assert_eq!(second.commit, CommitOutcome::NothingToCommit);
        assert!(second.succeeded());
        assert_eq!(vcs.pushes().len(), 2);
    }

    #[test]
    fn test_push_scoped_to_configured_folder_and_branch() {
        let deploy = DeployConfig {
            folder: "site/public".into(),
            branch: "pages".into(),
            remote: "upstream".into(),
            ..Default::default()
        };
        let vcs = FakeVcs::dirty();
        let report = run(&vcs, &deploy, "site/public");

        assert_eq!(vcs.pushes(), ["push site/public upstream pages"]);
        assert_eq!(report.target.prefix, "site/public");
    }

    #[test]
    fn test_placeholder_banner_without_identity() {
        let destination = Destination::resolve(None, Some("/srv/git/site.git"));
        assert_eq!(destination, Destination::Placeholder);

        let report = run(&FakeVcs::dirty(), &DeployConfig::default(), "dist");
        let Banner::Success(message) = Banner::new(&report, &destination) else {
            panic!("expected success banner");
        };
        assert!(message.contains("[username]"));
        assert!(message.contains("[repository]"));
    }

    #[test]
    fn test_destination_prefers_configured_url() {
        let destination = Destination::resolve(
            Some("https://blog.example.com/"),
            Some("git@github.com:alice/blog.git"),
        );
        assert_eq!(
            destination,
            Destination::Resolved("https://blog.example.com/".into())
        );
        assert_eq!(Destination::resolve(None, None), Destination::Placeholder);
    }

    // ------------------------------------------------------------------------
    // deploy_site against real repositories
    // ------------------------------------------------------------------------

    fn project(root: &std::path::Path) -> ProjectConfig {
        ProjectConfig {
            root: root.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_deploy_site_publishes_folder() {
        if !subtree_available() {
            return;
        }
        let repo = TestRepo::new();
        let report = deploy_site(&project(&repo.work)).unwrap();

        assert_eq!(report.commit, CommitOutcome::Committed);
        assert_eq!(report.push, PushOutcome::Pushed);
        assert!(report.succeeded());
        assert_eq!(repo.last_subject(), "Deploy site");
        assert_eq!(repo.published_files("gh-pages"), "index.html");
    }

    #[test]
    fn test_deploy_site_without_remote_ends_in_failure_banner() {
        if !subtree_available() {
            return;
        }
        let repo = TestRepo::without_remote();
        let report = deploy_site(&project(&repo.work)).unwrap();

        assert_eq!(report.commit, CommitOutcome::Committed);
        assert!(matches!(report.push, PushOutcome::Failed(_)));
        assert!(!report.succeeded());
        let banner = Banner::new(&report, &Destination::Placeholder);
        let Banner::Failure { summary, .. } = banner else {
            panic!("expected failure banner, got {banner:?}");
        };
        assert!(summary.contains("remote `origin`"));
    }

    #[test]
    fn test_deploy_site_with_config_below_toplevel() {
        if !subtree_available() {
            return;
        }
        let repo = TestRepo::new();
        let root = repo.build_output("site/web");
        let report = deploy_site(&project(&root)).unwrap();

        assert_eq!(report.target.prefix, "site/web/dist");
        assert_eq!(report.push, PushOutcome::Pushed);
        assert_eq!(repo.published_files("gh-pages"), "index.html");
    }

    #[test]
    fn test_deploy_site_twice_without_changes() {
        if !subtree_available() {
            return;
        }
        let repo = TestRepo::new();
        let config = project(&repo.work);

        let first = deploy_site(&config).unwrap();
        let second = deploy_site(&config).unwrap();

        assert_eq!(first.commit, CommitOutcome::Committed);
        assert_eq!(second.commit, CommitOutcome::NothingToCommit);
        assert_eq!(second.push, PushOutcome::Pushed);
        assert_eq!(repo.published_files("gh-pages"), "index.html");
    }
}
