//! Remote URL parsing.
//!
//! Turns the URL of a git remote into the root URL of the GitLab instance and
//! the project path it points to. Three forms are understood:
//!
//! - `http(s)://[user[:password]@]host[:port]/namespace/project[.git]`
//! - `ssh://[user@]host[:port]/namespace/project[.git]`
//! - `[user@]host[:namespace/project[.git]]` (scp-like)

use std::sync::LazyLock;

use regex::Regex;

// Credentials in the userinfo part never reach the root URL.
static HTTP_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)(?:[^/@]*@)?([^/]+)/*(.*)$").expect("valid regex")
});

static SSH_URL_REMOTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^ssh://(?:[^@/]*@)?([^:/]+)(?::\d+)?/*(.*)$").expect("valid regex")
});

static SCP_REMOTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^@/]*@)?([^:/]+)(?::(.*))?$").expect("valid regex"));

const GIT_SUFFIX: &str = ".git";

/// GitLab instance and project path derived from a git remote URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RemoteDescriptor {
    /// Scheme and host (with port, if any), e.g. `https://gitlab.com`.
    pub root_url: String,
    /// Slash separated project path without `.git`, e.g. `group/project`.
    pub project_path: String,
}

impl RemoteDescriptor {
    /// Parse a remote URL. Never fails: unknown forms are treated as a bare
    /// host, and the empty string gives an empty descriptor.
    pub fn parse(remote: &str) -> Self {
        let remote = remote.trim();
        if remote.is_empty() {
            return Self::default();
        }

        if let Some(caps) = HTTP_REMOTE.captures(remote) {
            return Self {
                root_url: format!("{}{}", &caps[1], &caps[2]),
                project_path: clean_path(&caps[3]),
            };
        }

        if let Some(caps) = SSH_URL_REMOTE.captures(remote) {
            return Self {
                root_url: format!("https://{}", &caps[1]),
                project_path: clean_path(&caps[2]),
            };
        }

        if let Some(caps) = SCP_REMOTE.captures(remote) {
            return Self {
                root_url: format!("https://{}", &caps[1]),
                project_path: caps.get(2).map(|m| clean_path(m.as_str())).unwrap_or_default(),
            };
        }

        Self {
            root_url: format!("https://{}", remote),
            project_path: String::new(),
        }
    }
}

fn clean_path(path: &str) -> String {
    let path = path.trim_matches('/');
    path.strip_suffix(GIT_SUFFIX).unwrap_or(path).to_string()
}
