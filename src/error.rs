//! Error types for gitlab-ci-linter.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code for a hook install/uninstall blocked by a foreign hook.
pub const EXIT_HOOK_CONFLICT: i32 = 4;

/// Exit code for every operational failure.
pub const EXIT_FAILURE: i32 = 5;

/// Exit code for a CI file rejected by the lint API.
pub const EXIT_INVALID: i32 = 10;

/// Linter error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error while reading '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No gitlab-ci file found from {}", .0.display())]
    CiFileNotFound(PathBuf),

    #[error("No git repository found from {}", .0.display())]
    RepositoryNotFound(PathBuf),

    #[error("Failed to read repository configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("Invalid settings: {0}")]
    Settings(String),

    #[error("No GitLab project identifier found: set a project ID or path, or configure an origin remote")]
    NoProjectIdentifier,

    #[error("GitLab API endpoint {url} responded with HTTP {status}")]
    EndpointUnreachable { url: String, status: u16 },

    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {url}: {reason}")]
    Protocol { url: String, reason: String },

    #[error("{reason} ({})", path.display())]
    HookConflict { path: PathBuf, reason: String },
}

impl Error {
    /// Process exit code reported for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::HookConflict { .. } => EXIT_HOOK_CONFLICT,
            Error::Io(_)
            | Error::ReadFile { .. }
            | Error::CiFileNotFound(_)
            | Error::RepositoryNotFound(_)
            | Error::Config { .. }
            | Error::Settings(_)
            | Error::NoProjectIdentifier
            | Error::EndpointUnreachable { .. }
            | Error::Transport { .. }
            | Error::Protocol { .. } => EXIT_FAILURE,
        }
    }

    pub(crate) fn protocol(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Protocol {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
