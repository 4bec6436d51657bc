//! `install` command: link the executable as the repository's pre-commit hook.

use tracing::debug;

use super::hooks::{HookLinks, HookState, PRE_COMMIT};
use super::output;
use super::project::{client_for, lint_target, locate_repository};
use crate::config::Settings;
use crate::error::Error;
use crate::gitlab;

/// Install the pre-commit hook. The lint endpoint is probed first so a hook is
/// never installed for a project the linter cannot reach.
pub async fn run(settings: &Settings) -> Result<i32, Error> {
    let git_dir = locate_repository(settings, settings.ci_file.as_deref())
        .ok_or_else(|| Error::RepositoryNotFound(settings.directory.clone()))?;
    debug!(path = %git_dir.display(), "Git repository found");

    let target = lint_target(settings, Some(&git_dir))?;
    let client = client_for(settings, &target.root_url)?;
    gitlab::resolve(&client, &target.root_url, &target.project).await?;

    let links = HookLinks::for_current_exe(&git_dir)?;
    match links.install(PRE_COMMIT)? {
        HookState::Created => {
            let repo_dir = git_dir.parent().unwrap_or(&git_dir);
            output::success(format!(
                "Git pre-commit hook installed in {}",
                repo_dir.display()
            ));
            Ok(0)
        }
        HookState::AlreadyCreated => {
            output::notice("Already installed.");
            Ok(0)
        }
        HookState::AlreadyExists => Err(Error::HookConflict {
            path: links.hook_path(PRE_COMMIT),
            reason: "A pre-commit hook already exists. Please install manually by adding a call to me in your pre-commit script.".to_string(),
        }),
        state @ (HookState::Deleted | HookState::NotExisting | HookState::NotMatching) => {
            Err(Error::Settings(format!("Unexpected hook state after install: {:?}", state)))
        }
    }
}
