//! Git hook installation and management.
//!
//! The hook is a symlink from `.git/hooks/<name>` to the running executable.
//! Existing hooks are inspected without following links, and only a link to
//! this executable is ever removed; anything else is reported and left alone.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::Error;

/// Hook installed by the `install` command.
pub const PRE_COMMIT: &str = "pre-commit";

/// State of a hook after an install or uninstall attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookState {
    /// The link was created.
    Created,
    /// The link already pointed to this executable.
    AlreadyCreated,
    /// Another hook (file or foreign link) is in place.
    AlreadyExists,
    /// The link to this executable was removed.
    Deleted,
    /// There was no hook to remove.
    NotExisting,
    /// The hook is not a link to this executable; left untouched.
    NotMatching,
}

/// Hook links of one repository, pointing to one executable.
pub struct HookLinks {
    hooks_dir: PathBuf,
    executable: PathBuf,
}

impl HookLinks {
    pub fn new(git_dir: &Path, executable: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: git_dir.join("hooks"),
            executable: executable.into(),
        }
    }

    /// Hook links for the currently running executable.
    pub fn for_current_exe(git_dir: &Path) -> Result<Self, Error> {
        let executable = std::env::current_exe()?;
        Ok(Self::new(git_dir, canonical(&executable)))
    }

    /// Path of the hook `name`.
    pub fn hook_path(&self, name: &str) -> PathBuf {
        self.hooks_dir.join(name)
    }

    /// Link hook `name` to the executable, unless a hook is already there.
    pub fn install(&self, name: &str) -> Result<HookState, Error> {
        fs::create_dir_all(&self.hooks_dir)?;
        let path = self.hook_path(name);

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                symlink(&self.executable, &path)?;
                info!(hook = name, target = %self.executable.display(), "Installed hook link");
                return Ok(HookState::Created);
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.file_type().is_symlink() && self.links_to_executable(&path)? {
            Ok(HookState::AlreadyCreated)
        } else {
            debug!(path = %path.display(), "Foreign hook in place");
            Ok(HookState::AlreadyExists)
        }
    }

    /// Remove hook `name` if it is a link to the executable.
    pub fn uninstall(&self, name: &str) -> Result<HookState, Error> {
        let path = self.hook_path(name);

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(HookState::NotExisting),
            Err(e) => return Err(e.into()),
        };

        if metadata.file_type().is_symlink() && self.links_to_executable(&path)? {
            fs::remove_file(&path)?;
            info!(hook = name, "Removed hook link");
            Ok(HookState::Deleted)
        } else {
            debug!(path = %path.display(), "Hook does not link to this executable");
            Ok(HookState::NotMatching)
        }
    }

    /// Whether the symlink at `link` resolves to the executable. Relative
    /// targets are resolved against the hooks directory.
    fn links_to_executable(&self, link: &Path) -> Result<bool, Error> {
        let target = fs::read_link(link)?;
        let target = if target.is_absolute() {
            target
        } else {
            self.hooks_dir.join(target)
        };

        Ok(canonical(&target) == canonical(&self.executable))
    }
}

/// Canonical form of `path`, or `path` itself when it cannot be resolved
/// (dangling link, missing file).
fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}
