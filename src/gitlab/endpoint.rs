//! Lint endpoint resolution.
//!
//! The lint API is project scoped: `/api/v4/projects/:id/ci/lint`. The
//! endpoint is built from the instance root URL and a project identifier, then
//! confirmed with a GET probe before the lint POST is sent. GitLab may redirect
//! the GET (http to https, canonical host...), but clients do not replay a POST
//! body across redirects, so the redirect target is folded back into the
//! endpoint up front.

use std::fmt;

use reqwest::{Method, Url};
use tracing::{debug, info};

use super::client::GitlabClient;
use crate::error::Error;

/// Versioned API prefix.
pub const API_PREFIX: &str = "/api/v4";

/// Identifier of the GitLab project whose lint API is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRef {
    /// Numeric (or opaque) project ID.
    Id(String),
    /// Full project path, `namespace/project`.
    Path(String),
}

impl ProjectRef {
    /// Pick the project identifier: explicit ID, then explicit path, then the
    /// path parsed from the origin remote. Blank values are ignored.
    pub fn select(
        id: Option<&str>,
        path: Option<&str>,
        remote_path: Option<&str>,
    ) -> Result<Self, Error> {
        let present = |value: Option<&str>| {
            value
                .map(|v| v.trim().trim_matches('/'))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        if let Some(id) = present(id) {
            return Ok(ProjectRef::Id(id));
        }
        present(path)
            .or_else(|| present(remote_path))
            .map(ProjectRef::Path)
            .ok_or(Error::NoProjectIdentifier)
    }

    fn as_str(&self) -> &str {
        match self {
            ProjectRef::Id(id) => id,
            ProjectRef::Path(path) => path,
        }
    }

    /// Route of the lint API for this project, relative to the root URL.
    pub fn lint_route(&self) -> String {
        format!(
            "{}/projects/{}/ci/lint",
            API_PREFIX,
            urlencoding::encode(self.as_str())
        )
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectRef::Id(id) => write!(f, "project #{}", id),
            ProjectRef::Path(path) => write!(f, "project {}", path),
        }
    }
}

/// Lint endpoint of a project on a GitLab instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub root_url: String,
    pub project: ProjectRef,
    pub url: Url,
}

impl ResolvedEndpoint {
    /// Build the candidate endpoint. It is only trustworthy once [`resolve`]
    /// has probed it.
    pub(crate) fn new(root_url: &str, project: &ProjectRef) -> Result<Self, Error> {
        let root_url = root_url.trim_end_matches('/').to_string();
        let raw = format!("{}{}", root_url, project.lint_route());
        let url = Url::parse(&raw)
            .map_err(|e| Error::Settings(format!("Invalid GitLab URL '{}': {}", raw, e)))?;

        Ok(Self {
            root_url,
            project: project.clone(),
            url,
        })
    }
}

/// Probe the lint endpoint of `project` on `root_url` and return the endpoint
/// the lint call must use.
///
/// The probe is a GET carrying the same authentication as the lint call,
/// following redirects. A non-success status is an error.
pub async fn resolve(
    client: &GitlabClient,
    root_url: &str,
    project: &ProjectRef,
) -> Result<ResolvedEndpoint, Error> {
    let candidate = ResolvedEndpoint::new(root_url, project)?;
    debug!(url = %candidate.url, authenticated = client.has_token(), "Probing GitLab lint endpoint");

    let response = client
        .request(Method::GET, candidate.url.clone())
        .send()
        .await
        .map_err(|source| Error::Transport {
            url: candidate.url.to_string(),
            source,
        })?;

    let status = response.status();
    let mut final_url = response.url().clone();
    final_url.set_query(None);
    final_url.set_fragment(None);

    if !status.is_success() {
        return Err(Error::EndpointUnreachable {
            url: final_url.to_string(),
            status: status.as_u16(),
        });
    }

    if final_url == candidate.url {
        debug!(url = %candidate.url, "Lint endpoint validated");
        return Ok(candidate);
    }

    let resolved = redirected(candidate, final_url)?;
    info!(url = %resolved.url, root = %resolved.root_url, "Lint endpoint redirected");
    Ok(resolved)
}

/// Fold a redirect target back into an endpoint.
fn redirected(candidate: ResolvedEndpoint, final_url: Url) -> Result<ResolvedEndpoint, Error> {
    let route = candidate.project.lint_route();

    match final_url.as_str().strip_suffix(route.as_str()) {
        Some(root) if !root.is_empty() => ResolvedEndpoint::new(root, &candidate.project),
        // Redirected to another route (renamed project...): use it verbatim.
        _ => Ok(ResolvedEndpoint {
            root_url: final_url.origin().ascii_serialization(),
            project: candidate.project,
            url: final_url,
        }),
    }
}
