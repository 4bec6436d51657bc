//! `check` command: validate the gitlab-ci file with the lint API.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::output;
use super::project::{client_for, lint_target, locate_repository};
use crate::config::Settings;
use crate::error::{Error, EXIT_INVALID};
use crate::git;
use crate::gitlab::{self, LintOutcome, LintRequest};

/// Run the check. Returns the exit code: 0 when the file is valid or there is
/// no file to check, 10 when GitLab rejects it.
pub async fn run(settings: &Settings) -> Result<i32, Error> {
    let ci_file = match &settings.ci_file {
        Some(file) => file.clone(),
        None => match git::find_ci_file(&settings.directory) {
            Ok(file) => file,
            Err(Error::CiFileNotFound(_)) => {
                println!("No gitlab-ci file found");
                return Ok(0);
            }
            Err(e) => return Err(e),
        },
    };
    debug!(path = %ci_file.display(), "Checking gitlab-ci file");

    let git_dir = locate_repository(settings, Some(&ci_file));
    let target = lint_target(settings, git_dir.as_deref())?;
    if git_dir.is_none() {
        output::warning(format!(
            "No GIT repository found, using GitLab API '{}'",
            target.root_url
        ));
    }

    let client = client_for(settings, &target.root_url)?;
    let endpoint = gitlab::resolve(&client, &target.root_url, &target.project).await?;

    let content = std::fs::read_to_string(&ci_file).map_err(|source| Error::ReadFile {
        path: ci_file.clone(),
        source,
    })?;
    let request = LintRequest {
        dry_run: settings.dry_run,
        git_ref: settings.dry_run_ref.clone(),
        ..LintRequest::new(content)
    };

    let display_path = relative_to_cwd(&ci_file);
    output::progress(format!("Validating {}...", display_path.display()));
    if settings.verbose {
        println!();
    }

    let report = match client.lint(&endpoint, &request).await {
        Ok(report) => report,
        Err(e) => {
            println!();
            return Err(e);
        }
    };

    if settings.verbose {
        output::progress(display_path.display());
    }

    let code = match &report.outcome {
        LintOutcome::Valid => {
            output::success("OK");
            0
        }
        LintOutcome::Invalid(messages) => {
            output::failure("KO");
            if !messages.is_empty() {
                output::error(messages.join("\n"));
            }
            EXIT_INVALID
        }
    };

    for warning in &report.warnings {
        output::warning(format!("Warning: {}", warning));
    }
    if settings.merged_yaml {
        if let Some(yaml) = &report.merged_yaml {
            println!("{}", yaml);
        }
    }

    Ok(code)
}

/// `path` relative to the working directory when it lies below it.
fn relative_to_cwd(path: &Path) -> PathBuf {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| std::fs::canonicalize(cwd).ok())
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GlobalOptions;
    use crate::config::FileConfig;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const LINT_PATH: &str = "/api/v4/projects/team%2Fproj/ci/lint";

    async fn gitlab(lint_body: serde_json::Value) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LINT_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(LINT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(lint_body))
            .mount(&server)
            .await;
        server
    }

    fn workspace(server: &MockServer) -> TempDir {
        let temp = TempDir::new().unwrap();
        let git_dir = temp.path().join(".git");
        fs::create_dir_all(&git_dir).unwrap();
        fs::write(
            git_dir.join("config"),
            format!("[remote \"origin\"]\n\turl = {}/team/proj.git\n", server.uri()),
        )
        .unwrap();
        fs::write(temp.path().join(".gitlab-ci.yml"), "stages:\n  - build\n").unwrap();
        temp
    }

    fn settings(dir: &Path, tweak: impl FnOnce(&mut GlobalOptions)) -> Settings {
        let mut options = GlobalOptions {
            directory: Some(dir.to_path_buf()),
            ..GlobalOptions::default()
        };
        tweak(&mut options);
        Settings::resolve(&options, None, FileConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_valid_file_exits_zero() {
        let server = gitlab(serde_json::json!({"valid": true})).await;
        let temp = workspace(&server);

        assert_eq!(run(&settings(temp.path(), |_| {})).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_file_exits_ten() {
        let server = gitlab(serde_json::json!({"valid": false, "errors": ["jobs config should contain at least one visible job"]})).await;
        let temp = workspace(&server);

        assert_eq!(run(&settings(temp.path(), |_| {})).await.unwrap(), EXIT_INVALID);
    }

    #[tokio::test]
    async fn test_dry_run_fields_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(LINT_PATH))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(LINT_PATH))
            .and(body_json(serde_json::json!({
                "content": "stages:\n  - build\n",
                "dry_run": true,
                "ref": "main",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"valid": true})))
            .expect(1)
            .mount(&server)
            .await;
        let temp = workspace(&server);

        let settings = settings(temp.path(), |o| {
            o.dry_run = true;
            o.dry_run_ref = Some("main".to_string());
        });
        assert_eq!(run(&settings).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_no_ci_file_exits_zero() {
        let temp = TempDir::new().unwrap();

        assert_eq!(run(&settings(temp.path(), |_| {})).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let temp = workspace(&server);

        let err = run(&settings(temp.path(), |_| {})).await.unwrap_err();
        assert!(matches!(err, Error::EndpointUnreachable { status: 404, .. }), "{err:?}");
        assert_eq!(err.exit_code(), crate::error::EXIT_FAILURE);
    }

    #[tokio::test]
    async fn test_no_repository_uses_explicit_target() {
        let server = gitlab(serde_json::json!({"valid": true})).await;
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".gitlab-ci.yml"), "stages:\n  - build\n").unwrap();

        let settings = settings(temp.path(), |o| {
            o.gitlab_url = Some(server.uri());
            o.project_path = Some("team/proj".to_string());
        });
        assert_eq!(run(&settings).await.unwrap(), 0);
    }
}
