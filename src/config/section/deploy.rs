//! `[deploy]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [deploy]
//! branch = "gh-pages"            # Hosting branch
//! folder = "dist"                # Build output folder (relative to root)
//! remote = "origin"              # Remote to push to
//! message = "Deploy site"        # Commit message for pending changes
//! force = false                  # Force push (overwrites remote history)
//! url = "https://example.com/"   # Optional: destination shown on success
//! on_commit_error = "continue"   # continue | abort
//! ```

use super::super::{ConfigDiagnostics, FieldPath};
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};

/// What to do when the commit step fails (not "nothing to commit").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitErrorPolicy {
    /// Attempt the push anyway.
    #[default]
    Continue,
    /// Skip the push and fail the run.
    Abort,
}

/// Deploy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Target branch for deployment (e.g., "gh-pages").
    pub branch: String,

    /// Folder whose history becomes the branch, relative to the project root.
    pub folder: PathBuf,

    /// Remote name.
    pub remote: String,

    /// Commit message used when staging pending changes.
    pub message: String,

    /// Force push (overwrites remote history).
    pub force: bool,

    /// Destination URL printed on success. Derived from the remote when unset.
    pub url: Option<String>,

    /// Policy for a failed commit step.
    pub on_commit_error: CommitErrorPolicy,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            branch: "gh-pages".to_string(),
            folder: PathBuf::from("dist"),
            remote: "origin".to_string(),
            message: "Deploy site".to_string(),
            force: false,
            url: None,
            on_commit_error: CommitErrorPolicy::Continue,
        }
    }
}

/// Field paths of the `[deploy]` section.
pub struct DeployFields {
    pub branch: FieldPath,
    pub folder: FieldPath,
    pub remote: FieldPath,
    pub message: FieldPath,
    pub force: FieldPath,
    pub url: FieldPath,
}

impl DeployConfig {
    pub const FIELDS: DeployFields = DeployFields {
        branch: FieldPath::new("deploy.branch"),
        folder: FieldPath::new("deploy.folder"),
        remote: FieldPath::new("deploy.remote"),
        message: FieldPath::new("deploy.message"),
        force: FieldPath::new("deploy.force"),
        url: FieldPath::new("deploy.url"),
    };

    /// Validate deploy configuration against the project root.
    ///
    /// # Checks
    /// - `branch` and `remote` are non-empty single words.
    /// - `message` is not blank.
    /// - `folder` is a relative path to an existing directory under `root`.
    /// - `url`, if set, is an http(s) URL.
    pub fn validate(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        let fields = &Self::FIELDS;

        for (field, value) in [(fields.branch, &self.branch), (fields.remote, &self.remote)] {
            if value.trim().is_empty() {
                diag.error(field, format!("{} must not be empty", field.as_str()));
            } else if value.contains(char::is_whitespace) {
                diag.error(field, format!("{} must not contain whitespace: {value:?}", field.as_str()));
            }
        }

        if self.message.trim().is_empty() {
            diag.error(fields.message, "commit message cannot be empty");
        }

        self.validate_folder(root, diag);

        if let Some(url) = &self.url {
            match url::Url::parse(url) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => diag.error_with_hint(
                    fields.url,
                    format!("invalid destination url: {url}"),
                    "use a full address such as https://user.github.io/site/",
                ),
            }
        }

        if self.force {
            diag.warn(fields.force, "force push overwrites the remote branch history");
        }
    }

    fn validate_folder(&self, root: &Path, diag: &mut ConfigDiagnostics) {
        let field = Self::FIELDS.folder;
        let folder = &self.folder;

        if folder.as_os_str().is_empty() || folder == Path::new(".") {
            diag.error_with_hint(
                field,
                "folder must name a subdirectory, not the project root",
                "set `folder = \"dist\"` (or your build output directory)",
            );
            return;
        }

        let escapes_root = folder
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes_root {
            diag.error(
                field,
                format!("folder must be relative to the project root: {}", folder.display()),
            );
            return;
        }

        let full = root.join(folder);
        if !full.exists() {
            diag.error_with_hint(
                field,
                format!("folder not found: {}", full.display()),
                "build the site first",
            );
        } else if !full.is_dir() {
            diag.error(field, format!("folder is not a directory: {}", full.display()));
        }
    }

    /// Folder as the `/`-separated prefix `git subtree` expects.
    ///
    /// `git subtree` runs from the work tree `toplevel`, so the prefix is
    /// `root/folder` relative to it, not to the project root.
    pub fn subtree_prefix(&self, root: &Path, toplevel: &Path) -> Result<String> {
        let folder = root.join(&self.folder);
        let folder = fs::canonicalize(&folder)
            .with_context(|| format!("Failed to resolve {}", folder.display()))?;
        let toplevel = fs::canonicalize(toplevel)
            .with_context(|| format!("Failed to resolve {}", toplevel.display()))?;

        let relative = folder.strip_prefix(&toplevel).map_err(|_| {
            anyhow!(
                "{} is outside the git work tree {}",
                folder.display(),
                toplevel.display()
            )
        })?;
        let prefix = relative
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");

        if prefix.is_empty() {
            return Err(anyhow!("{} is the work tree itself", folder.display()));
        }
        Ok(prefix)
    }
}
