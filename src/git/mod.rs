//! Repository discovery.
//!
//! Walks up the filesystem from a start directory to find the `.git`
//! directory and the gitlab-ci file, and reads the origin remote URL from the
//! repository configuration.

pub mod remote;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;

pub use remote::RemoteDescriptor;

/// Name of the git metadata directory.
pub const GIT_DIR_NAME: &str = ".git";

/// Name of the configuration file inside the git metadata directory.
pub const GIT_CONFIG_NAME: &str = "config";

/// Name of the gitlab-ci file searched for when none is given.
pub const CI_FILE_NAME: &str = ".gitlab-ci.yml";

/// Find the closest `.git` directory holding a `config` file.
///
/// `start` and each of its ancestors are checked, closest first. A `.git`
/// directory without a `config` file does not stop the search.
pub fn find_git_dir(start: &Path) -> Result<PathBuf, Error> {
    for dir in start.ancestors() {
        let candidate = dir.join(GIT_DIR_NAME);
        if candidate.is_dir() && candidate.join(GIT_CONFIG_NAME).is_file() {
            debug!(path = %candidate.display(), "Found git repository");
            return Ok(candidate);
        }
    }

    Err(Error::RepositoryNotFound(start.to_path_buf()))
}

/// Find the closest gitlab-ci file from `start` upwards.
pub fn find_ci_file(start: &Path) -> Result<PathBuf, Error> {
    for dir in start.ancestors() {
        let candidate = dir.join(CI_FILE_NAME);
        if candidate.is_file() {
            debug!(path = %candidate.display(), "Found gitlab-ci file");
            return Ok(candidate);
        }
    }

    Err(Error::CiFileNotFound(start.to_path_buf()))
}

/// Read `remote.origin.url` from the repository configuration.
///
/// Returns `Ok(None)` when the repository has no origin remote URL.
pub fn origin_remote_url(git_dir: &Path) -> Result<Option<String>, Error> {
    let config_path = git_dir.join(GIT_CONFIG_NAME);
    let config_error = |e: git2::Error| Error::Config {
        path: git_dir.to_path_buf(),
        reason: e.message().to_string(),
    };

    let config = git2::Config::open(&config_path).map_err(config_error)?;

    match config.get_string("remote.origin.url") {
        Ok(url) => Ok(Some(url.trim().to_string()).filter(|url| !url.is_empty())),
        Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
        Err(e) => Err(config_error(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn init_repo(root: &Path, config: &str) -> PathBuf {
        let git_dir = root.join(GIT_DIR_NAME);
        fs::create_dir_all(&git_dir).unwrap();
        fs::write(git_dir.join(GIT_CONFIG_NAME), config).unwrap();
        git_dir
    }

    #[test]
    fn test_find_git_dir_from_nested_directory() {
        let temp = TempDir::new().unwrap();
        let git_dir = init_repo(temp.path(), "[core]\n\tbare = false\n");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_git_dir(&nested).unwrap(), git_dir);
        assert_eq!(find_git_dir(temp.path()).unwrap(), git_dir);
    }

    #[test]
    fn test_find_git_dir_skips_git_dir_without_config() {
        let temp = TempDir::new().unwrap();
        let git_dir = init_repo(temp.path(), "[core]\n");
        let inner = temp.path().join("inner");
        fs::create_dir_all(inner.join(GIT_DIR_NAME)).unwrap();

        assert_eq!(find_git_dir(&inner).unwrap(), git_dir);
    }

    #[test]
    fn test_find_git_dir_not_found() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("nothing").join("here");
        fs::create_dir_all(&nested).unwrap();

        // The temp dir may itself live inside a repository, so only check
        // that nothing below the temp root is reported.
        match find_git_dir(&nested) {
            Ok(found) => assert!(!found.starts_with(temp.path())),
            Err(e) => assert!(matches!(e, Error::RepositoryNotFound(_))),
        }
    }

    #[test]
    fn test_find_git_dir_from_filesystem_root() {
        let root = Path::new("/");
        match find_git_dir(root) {
            Ok(found) => assert_eq!(found, root.join(GIT_DIR_NAME)),
            Err(e) => assert!(matches!(e, Error::RepositoryNotFound(_))),
        }
    }

    #[test]
    fn test_find_ci_file() {
        let temp = TempDir::new().unwrap();
        let ci_file = temp.path().join(CI_FILE_NAME);
        fs::write(&ci_file, "stages:\n  - build\n").unwrap();
        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_ci_file(&nested).unwrap(), ci_file);
    }

    #[test]
    fn test_find_ci_file_ignores_directories() {
        let temp = TempDir::new().unwrap();
        let ci_file = temp.path().join(CI_FILE_NAME);
        fs::write(&ci_file, "stages: []\n").unwrap();
        let nested = temp.path().join("sub");
        fs::create_dir_all(nested.join(CI_FILE_NAME)).unwrap();

        assert_eq!(find_ci_file(&nested).unwrap(), ci_file);
    }

    #[test]
    fn test_origin_remote_url() {
        let temp = TempDir::new().unwrap();
        let git_dir = init_repo(
            temp.path(),
            "[core]\n\tbare = false\n[remote \"origin\"]\n\turl = git@example.com:team/proj.git\n\tfetch = +refs/heads/*:refs/remotes/origin/*\n",
        );

        assert_eq!(
            origin_remote_url(&git_dir).unwrap().as_deref(),
            Some("git@example.com:team/proj.git")
        );
    }

    #[test]
    fn test_origin_remote_url_missing_section() {
        let temp = TempDir::new().unwrap();
        let git_dir = init_repo(
            temp.path(),
            "[remote \"upstream\"]\n\turl = https://example.com/other/proj.git\n",
        );

        assert_eq!(origin_remote_url(&git_dir).unwrap(), None);
    }

    #[test]
    fn test_origin_remote_url_unparseable_config() {
        let temp = TempDir::new().unwrap();
        let git_dir = init_repo(temp.path(), "[remote \"origin\"\n\turl = \n");

        let err = origin_remote_url(&git_dir).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
