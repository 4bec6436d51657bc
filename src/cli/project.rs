//! Locating the repository and the GitLab project a command works on.

use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use crate::config::Settings;
use crate::error::Error;
use crate::git::{self, RemoteDescriptor};
use crate::gitlab::{GitlabClient, ProjectRef, DEFAULT_GITLAB_URL};
use crate::netrc;

/// GitLab instance and project targeted by the lint API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintTarget {
    pub root_url: String,
    pub project: ProjectRef,
}

/// Find the git repository: first from the gitlab-ci file location, then from
/// the search directory.
pub fn locate_repository(settings: &Settings, ci_file: Option<&Path>) -> Option<PathBuf> {
    ci_file
        .and_then(Path::parent)
        .and_then(|dir| git::find_git_dir(dir).ok())
        .or_else(|| git::find_git_dir(&settings.directory).ok())
}

/// Work out the GitLab root URL and project for `git_dir`.
///
/// Explicit settings win over the origin remote. A repository without an
/// origin remote is a configuration error unless both the GitLab URL and the
/// project are given explicitly.
pub fn lint_target(settings: &Settings, git_dir: Option<&Path>) -> Result<LintTarget, Error> {
    let explicit_project = settings.project_id.is_some() || settings.project_path.is_some();

    let remote = match git_dir {
        Some(dir) => match git::origin_remote_url(dir)? {
            Some(url) => {
                debug!(remote = %url, "Found origin remote");
                Some(RemoteDescriptor::parse(&url))
            }
            None if settings.gitlab_url.is_some() && explicit_project => None,
            None => {
                return Err(Error::Config {
                    path: dir.to_path_buf(),
                    reason: "no 'origin' remote URL configured".to_string(),
                })
            }
        },
        None => None,
    };

    let root_url = settings
        .gitlab_url
        .clone()
        .or_else(|| {
            remote
                .as_ref()
                .map(|r| r.root_url.clone())
                .filter(|root| !root.is_empty())
        })
        .unwrap_or_else(|| DEFAULT_GITLAB_URL.to_string());

    let project = ProjectRef::select(
        settings.project_id.as_deref(),
        settings.project_path.as_deref(),
        remote.as_ref().map(|r| r.project_path.as_str()),
    )?;

    debug!(root_url = %root_url, project = %project, "Lint target");
    Ok(LintTarget { root_url, project })
}

/// Personal access token for `root_url`: the explicit token, else the netrc
/// entry of its host when netrc lookup is enabled.
pub fn token_for(settings: &Settings, root_url: &str) -> Result<Option<String>, Error> {
    if let Some(token) = &settings.token {
        return Ok(Some(token.clone()));
    }
    if !settings.netrc {
        return Ok(None);
    }

    let Some(host) = Url::parse(root_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
    else {
        return Ok(None);
    };
    match netrc::netrc_path(settings.netrc_file.as_deref()) {
        Some(path) => netrc::token_for_host(&path, &host),
        None => Ok(None),
    }
}

/// HTTP client for `root_url` with the settings' timeout and token.
pub fn client_for(settings: &Settings, root_url: &str) -> Result<GitlabClient, Error> {
    GitlabClient::new(settings.timeout, token_for(settings, root_url)?)
}
