//! Configuration management for gitlab-ci-linter.
//!
//! Settings come from three places, highest precedence first: command line
//! flags (and their `GCL_*` environment variables), the TOML config file, and
//! built-in defaults. They are resolved once at startup into an immutable
//! [`Settings`] that is passed to every command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::cli::GlobalOptions;
use crate::error::Error;

/// Default HTTP request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Optional user configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Root URL of the GitLab instance.
    #[serde(default)]
    pub gitlab_url: Option<String>,

    /// Personal access token.
    #[serde(default)]
    pub personal_access_token: Option<String>,

    /// Read the token from .netrc.
    #[serde(default)]
    pub netrc: Option<bool>,

    /// Path of the .netrc file.
    #[serde(default)]
    pub netrc_file: Option<PathBuf>,

    /// HTTP request timeout, in seconds.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl FileConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gitlab-ci-linter").join("config.toml"))
    }

    /// Load the config file at `path`, or at the default location.
    ///
    /// A missing file yields the empty config.
    pub fn load(path: Option<&Path>) -> Result<Self, Error> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| Error::ReadFile {
            path: path.clone(),
            source,
        })?;
        let config: FileConfig = toml::from_str(&content)
            .map_err(|e| Error::Settings(format!("{}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

/// Resolved settings of one invocation.
#[derive(Clone, PartialEq)]
pub struct Settings {
    /// GitLab root URL override, normalized (scheme, no trailing slash).
    pub gitlab_url: Option<String>,
    /// gitlab-ci file to check, absolute.
    pub ci_file: Option<PathBuf>,
    /// Directory to search from, absolute.
    pub directory: PathBuf,
    pub project_path: Option<String>,
    pub project_id: Option<String>,
    pub token: Option<String>,
    pub netrc: bool,
    pub netrc_file: Option<PathBuf>,
    pub timeout: Duration,
    pub verbose: bool,
    pub merged_yaml: bool,
    pub dry_run: bool,
    pub dry_run_ref: Option<String>,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("gitlab_url", &self.gitlab_url)
            .field("ci_file", &self.ci_file)
            .field("directory", &self.directory)
            .field("project_path", &self.project_path)
            .field("project_id", &self.project_id)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("netrc", &self.netrc)
            .field("netrc_file", &self.netrc_file)
            .field("timeout", &self.timeout)
            .field("verbose", &self.verbose)
            .field("merged_yaml", &self.merged_yaml)
            .field("dry_run", &self.dry_run)
            .field("dry_run_ref", &self.dry_run_ref)
            .finish()
    }
}

impl Settings {
    /// Merge command line options, the PATH argument and the config file.
    ///
    /// PATH, when it exists, replaces `--directory` if it is a directory and
    /// `--ci-file` otherwise.
    pub fn resolve(
        options: &GlobalOptions,
        path: Option<&Path>,
        file: FileConfig,
    ) -> Result<Self, Error> {
        let mut directory = options.directory.clone();
        let mut ci_file = options.ci_file.clone();
        if let Some(path) = path {
            if path.is_dir() {
                directory = Some(path.to_path_buf());
            } else if path.exists() {
                ci_file = Some(path.to_path_buf());
            }
        }

        let directory = directory.unwrap_or_else(|| PathBuf::from("."));
        let directory = std::fs::canonicalize(&directory)
            .map_err(|_| Error::Settings(format!("'{}' does not exist", directory.display())))?;
        if !directory.is_dir() {
            return Err(Error::Settings(format!(
                "'{}' is not a directory",
                directory.display()
            )));
        }

        let ci_file = match ci_file {
            Some(file) => {
                let absolute = std::fs::canonicalize(&file)
                    .map_err(|_| Error::Settings(format!("'{}' does not exist", file.display())))?;
                if absolute.is_dir() {
                    return Err(Error::Settings(format!(
                        "'{}' is a directory, not a file",
                        absolute.display()
                    )));
                }
                Some(absolute)
            }
            None => None,
        };

        let gitlab_url = match options.gitlab_url.as_deref().or(file.gitlab_url.as_deref()) {
            Some(raw) => normalize_gitlab_url(raw)?,
            None => None,
        };

        let settings = Settings {
            gitlab_url,
            ci_file,
            directory,
            project_path: non_blank(options.project_path.as_deref()),
            project_id: non_blank(options.project_id.as_deref()),
            token: non_blank(options.personal_access_token.as_deref())
                .or_else(|| non_blank(file.personal_access_token.as_deref())),
            netrc: options.netrc || file.netrc.unwrap_or(false),
            netrc_file: options.netrc_file.clone().or(file.netrc_file),
            timeout: Duration::from_secs(
                options
                    .timeout
                    .or(file.timeout)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            verbose: options.verbose,
            merged_yaml: options.merged_yaml,
            dry_run: options.dry_run,
            dry_run_ref: non_blank(options.dry_run_ref.as_deref()),
        };
        debug!(settings = ?settings, "Resolved settings");
        Ok(settings)
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normalize a GitLab root URL: default to https when no scheme is given and
/// drop the trailing slash. Blank input means no override.
pub fn normalize_gitlab_url(raw: &str) -> Result<Option<String>, Error> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{}", raw)
    };
    let url = Url::parse(&with_scheme).map_err(|e| {
        Error::Settings(format!("Unable to parse GitLab root URL '{}': {}", raw, e))
    })?;

    Ok(Some(url.as_str().trim_end_matches('/').to_string()))
}
