//! HTTP client for the GitLab CI lint API.

use std::time::Duration;

use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, StatusCode};
use tracing::debug;

use super::endpoint::ResolvedEndpoint;
use super::types::{LintReport, LintRequest, LintResponse};
use crate::error::Error;

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Header carrying a GitLab personal access token.
pub const PRIVATE_TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// GitLab API client. One per invocation; requests are never retried.
pub struct GitlabClient {
    http: reqwest::Client,
    token: Option<String>,
}

impl GitlabClient {
    /// Create a client whose requests fail after `timeout`.
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Settings(format!("Unable to create an HTTP client: {}", e)))?;

        Ok(Self {
            http,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Whether requests carry a personal access token.
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Build a request with the headers shared by the probe and the lint call.
    pub(crate) fn request(&self, method: Method, url: reqwest::Url) -> RequestBuilder {
        let builder = self
            .http
            .request(method, url)
            .header(ACCEPT, HeaderValue::from_static("*/*"));

        match &self.token {
            Some(token) => builder.header(PRIVATE_TOKEN_HEADER, token),
            None => builder,
        }
    }

    /// Send a gitlab-ci file to the lint API.
    ///
    /// A file rejected by GitLab is an `Ok` report with an invalid outcome.
    /// Every other failure (transport, non-200 status, unreadable body) is an
    /// `Err`.
    pub async fn lint(
        &self,
        endpoint: &ResolvedEndpoint,
        request: &LintRequest,
    ) -> Result<LintReport, Error> {
        let url = endpoint.url.as_str().to_string();
        debug!(url = %url, dry_run = request.dry_run, "Querying GitLab CI lint API");

        let response = self
            .request(Method::POST, endpoint.url.clone())
            .json(request)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::protocol(url, format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|source| Error::Transport {
            url: url.clone(),
            source,
        })?;

        let parsed: LintResponse = serde_json::from_str(&body)
            .map_err(|e| Error::protocol(&url, format!("Unable to parse JSON response: {}", e)))?;

        parsed
            .into_report()
            .map_err(|reason| Error::protocol(url, reason))
    }
}
