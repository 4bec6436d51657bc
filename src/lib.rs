//! gitlab-ci-linter library.
//!
//! Lint `.gitlab-ci.yml` files with the GitLab CI lint API, and manage the
//! pre-commit hook that runs the linter.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod gitlab;
pub mod netrc;

pub use error::Error;
