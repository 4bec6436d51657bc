//! Personal access token lookup in a `.netrc` file.
//!
//! The token is read from the `account` field of the `machine` entry matching
//! the GitLab host, never from `password`, so the same file can keep serving
//! basic auth to other tools. The `default` entry is ignored.
//!
//! ```text
//! machine gitlab.com
//!   login me
//!   account MY_PERSONAL_ACCESS_TOKEN
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Error;

/// Resolve the netrc file to read: explicit path, then `$NETRC`, then the
/// platform default in the home directory. Returns `None` when that file does
/// not exist or is a directory.
pub fn netrc_path(explicit: Option<&Path>) -> Option<PathBuf> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| std::env::var_os("NETRC").map(PathBuf::from))
        .or_else(|| {
            let name = if cfg!(windows) { "_netrc" } else { ".netrc" };
            dirs::home_dir().map(|home| home.join(name))
        })?;

    path.is_file().then_some(path)
}

/// Look up the token for `host` in the netrc file at `path`.
pub fn token_for_host(path: &Path, host: &str) -> Result<Option<String>, Error> {
    let content = fs::read_to_string(path)?;
    let token = account_for_machine(&content, host);
    debug!(path = %path.display(), host, found = token.is_some(), "Looked up netrc token");
    Ok(token)
}

/// Return the `account` of the `machine <host>` entry.
///
/// Tokens may span lines. A `macdef` body runs to the next blank line and is
/// skipped.
fn account_for_machine(content: &str, host: &str) -> Option<String> {
    let mut lines = content.lines();
    let mut in_matching_machine = false;
    // Keyword still waiting for its value on a following line.
    let mut pending: Option<&str> = None;

    while let Some(line) = lines.next() {
        let line = line.split('#').next().unwrap_or_default();
        let mut tokens = line.split_whitespace();

        while let Some(token) = tokens.next() {
            if let Some(keyword) = pending.take() {
                match keyword {
                    "machine" => in_matching_machine = token == host,
                    "account" if in_matching_machine => return Some(token.to_string()),
                    _ => {}
                }
                continue;
            }

            match token {
                "machine" | "account" | "login" | "password" => pending = Some(token),
                "default" => in_matching_machine = false,
                "macdef" => {
                    // The macro name ends the line; the body follows.
                    for body in lines.by_ref() {
                        if body.trim().is_empty() {
                            break;
                        }
                    }
                    break;
                }
                _ => {}
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const NETRC: &str = "\
machine github.com
  login someone
  password hunter2

# GitLab tokens live in account
machine gitlab.com
  login me
  password basic-auth-secret
  account glpat-123

default
  login anonymous
  account default-token
";

    #[test]
    fn test_account_of_matching_machine() {
        assert_eq!(
            account_for_machine(NETRC, "gitlab.com").as_deref(),
            Some("glpat-123")
        );
    }

    #[test]
    fn test_machine_without_account() {
        assert_eq!(account_for_machine(NETRC, "github.com"), None);
    }

    #[test]
    fn test_default_entry_ignored() {
        assert_eq!(account_for_machine(NETRC, "forge.example.com"), None);
    }

    #[test]
    fn test_single_line_entries() {
        let content = "machine a.example login x account tok-a\nmachine b.example account tok-b\n";
        assert_eq!(account_for_machine(content, "b.example").as_deref(), Some("tok-b"));
        assert_eq!(account_for_machine(content, "a.example").as_deref(), Some("tok-a"));
    }

    #[test]
    fn test_macdef_body_is_skipped() {
        let content = "\
macdef init
cd /pub
account not-a-token

machine gitlab.com
  account glpat-after-macdef
";
        assert_eq!(
            account_for_machine(content, "gitlab.com").as_deref(),
            Some("glpat-after-macdef")
        );
    }

    #[test]
    fn test_macdef_inside_machine_entry() {
        let content = "\
machine ftp.example.com login anonymous macdef init
machine gitlab.com
account inside-macro

machine gitlab.com
  account glpat-real
";
        assert_eq!(
            account_for_machine(content, "gitlab.com").as_deref(),
            Some("glpat-real")
        );
    }

    #[test]
    fn test_value_on_next_line() {
        let content = "machine\n  gitlab.com\n  account\n  glpat-wrapped\n";
        assert_eq!(
            account_for_machine(content, "gitlab.com").as_deref(),
            Some("glpat-wrapped")
        );
    }

    #[test]
    fn test_token_for_host_reads_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("netrc");
        fs::write(&path, NETRC).unwrap();

        assert_eq!(
            token_for_host(&path, "gitlab.com").unwrap().as_deref(),
            Some("glpat-123")
        );
    }

    #[test]
    fn test_netrc_path_explicit() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("netrc");
        fs::write(&path, NETRC).unwrap();

        assert_eq!(netrc_path(Some(&path)), Some(path));
        assert_eq!(netrc_path(Some(temp.path())), None);
        assert_eq!(netrc_path(Some(&temp.path().join("missing"))), None);
    }
}
