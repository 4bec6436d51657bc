//! GitLab CI lint API.

pub mod client;
pub mod endpoint;
pub mod types;

pub use client::GitlabClient;
pub use endpoint::{resolve, ProjectRef, ResolvedEndpoint};
pub use types::{LintOutcome, LintReport, LintRequest};

/// GitLab instance used when nothing else points to one.
pub const DEFAULT_GITLAB_URL: &str = "https://gitlab.com";
