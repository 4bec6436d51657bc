//! `uninstall` command: remove the pre-commit hook link.

use tracing::debug;

use super::hooks::{HookLinks, HookState, PRE_COMMIT};
use super::output;
use super::project::locate_repository;
use crate::config::Settings;
use crate::error::Error;

/// Remove the pre-commit hook if it links to this executable. No network
/// access is needed.
pub fn run(settings: &Settings) -> Result<i32, Error> {
    let git_dir = locate_repository(settings, settings.ci_file.as_deref())
        .ok_or_else(|| Error::RepositoryNotFound(settings.directory.clone()))?;
    debug!(path = %git_dir.display(), "Git repository found");

    let links = HookLinks::for_current_exe(&git_dir)?;
    match links.uninstall(PRE_COMMIT)? {
        HookState::Deleted => {
            output::success("Git pre-commit hook uninstalled.");
            Ok(0)
        }
        HookState::NotExisting => {
            output::warning("No pre-commit hook found.");
            Ok(0)
        }
        HookState::NotMatching => Err(Error::HookConflict {
            path: links.hook_path(PRE_COMMIT),
            reason: "Unknown pre-commit hook. Please uninstall manually.".to_string(),
        }),
        state @ (HookState::Created | HookState::AlreadyCreated | HookState::AlreadyExists) => {
            Err(Error::Settings(format!("Unexpected hook state after uninstall: {:?}", state)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::GlobalOptions;
    use crate::config::FileConfig;
    use crate::error::EXIT_HOOK_CONFLICT;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn settings(dir: &Path) -> Settings {
        let options = GlobalOptions {
            directory: Some(dir.to_path_buf()),
            ..GlobalOptions::default()
        };
        Settings::resolve(&options, None, FileConfig::default()).unwrap()
    }

    fn repo() -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(".git").join("hooks")).unwrap();
        fs::write(temp.path().join(".git").join("config"), "").unwrap();
        temp
    }

    #[test]
    fn test_nothing_installed() {
        let temp = repo();
        assert_eq!(run(&settings(temp.path())).unwrap(), 0);
    }

    #[test]
    fn test_foreign_hook_is_conflict() {
        let temp = repo();
        let hook = temp.path().join(".git").join("hooks").join(PRE_COMMIT);
        fs::write(&hook, "#!/bin/sh\nmake lint\n").unwrap();

        let err = run(&settings(temp.path())).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_HOOK_CONFLICT);
        assert!(hook.exists());
    }

    #[test]
    fn test_without_repository() {
        let temp = TempDir::new().unwrap();
        let err = run(&settings(temp.path())).unwrap_err();
        assert!(matches!(err, Error::RepositoryNotFound(_)));
    }
}
