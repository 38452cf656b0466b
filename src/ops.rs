//! Operations modules for interacting with the systems `superdev` drives.
//!
//! - [`git`]: Git CLI operations on the working copy (clone, branch, commit, push)
//! - [`github`]: GitHub pull request and branch management via the REST API
//! - [`github_curl`]: Curl-based HTTP client for making GitHub API requests
//!
//! The `git` and `github` modules expose traits with a real implementation and
//! a mock for tests.

pub mod git;
pub mod github;
pub mod github_curl;
