//! prlint-github: GitHub integration for prlint
//!
//! - `client`: REST API client implementing `prlint_core::RepoHost`
//! - `event`: pull request context from the GitHub Actions runner

pub mod client;
pub mod event;

pub use client::{GitHubClient, GitHubConfig, DEFAULT_API_URL};
pub use event::{parse_pull_request_event, ActionContext};
