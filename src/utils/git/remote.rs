//! Remote URL parsing and hosting destination derivation.

/// Owner and repository named by a remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    pub host: String,
    pub owner: String,
    pub repo: String,
}

/// Parse a remote URL into host, owner and repository.
///
/// Accepts `https://host/owner/repo(.git)`, `ssh://git@host/owner/repo`
/// and scp-like `git@host:owner/repo.git`. Local paths yield `None`.
pub fn parse_remote(remote: &str) -> Option<RemoteIdentity> {
    let remote = remote.trim();
    let (host, path) = if remote.contains("://") {
        let parsed = url::Url::parse(remote).ok()?;
        if parsed.scheme() == "file" {
            return None;
        }
        (parsed.host_str()?.to_string(), parsed.path().to_string())
    } else {
        let (authority, path) = remote.split_once(':')?;
        // `C:\site` or `./a:b` are paths, not scp-like remotes
        if authority.len() < 2 || authority.contains(['/', '\\']) {
            return None;
        }
        let host = authority.rsplit('@').next()?;
        (host.to_string(), path.to_string())
    };

    let segments: Vec<_> = path
        .trim_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    let [.., owner, repo] = segments.as_slice() else {
        return None;
    };
    let repo = repo.strip_suffix(".git").unwrap_or(*repo);
    if repo.is_empty() {
        return None;
    }

    Some(RemoteIdentity {
        host: host.to_ascii_lowercase(),
        owner: (*owner).to_string(),
        repo: repo.to_string(),
    })
}

/// GitHub Pages address served for a remote, if it is a GitHub remote.
///
/// A `<owner>.github.io` repository is a user site served at the root,
/// any other repository is a project site under `/<repo>/`.
pub fn pages_url(identity: &RemoteIdentity) -> Option<String> {
    if identity.host != "github.com" {
        return None;
    }
    let owner = identity.owner.to_ascii_lowercase();
    let user_site = format!("{owner}.github.io");
    if identity.repo.eq_ignore_ascii_case(&user_site) {
        Some(format!("https://{user_site}/"))
    } else {
        Some(format!("https://{user_site}/{}/", identity.repo))
    }
}
