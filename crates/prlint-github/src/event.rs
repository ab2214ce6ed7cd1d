//! GitHub Actions trigger context.
//!
//! The runner writes the triggering webhook payload to `GITHUB_EVENT_PATH`.
//! Only `pull_request` / `pull_request_target` payloads carry what a lint
//! run needs.

use std::path::{Path, PathBuf};

use prlint_core::{LintError, PullRequestContext, RepoRef, Result};
use serde::Deserialize;
use tracing::debug;

const NOT_A_PULL_REQUEST: &str = "Could not get pull request number from context, exiting";

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<PullRequestPayload>,
}

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    number: Option<u64>,
    title: Option<String>,
    body: Option<String>,
    head: Option<HeadPayload>,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    ref_name: Option<String>,
}

/// Runner-provided context for the current workflow run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionContext {
    pub event_path: PathBuf,
    pub repository: RepoRef,
    pub sha: String,
}

impl ActionContext {
    pub fn new(event_path: impl Into<PathBuf>, repository: &str, sha: &str) -> Result<Self> {
        if sha.trim().is_empty() {
            return Err(LintError::Context("GITHUB_SHA is not set".to_string()));
        }
        Ok(Self {
            event_path: event_path.into(),
            repository: repository.parse()?,
            sha: sha.to_string(),
        })
    }

    /// Read the event payload and extract the pull request snapshot.
    pub fn pull_request_context(&self) -> Result<PullRequestContext> {
        let payload = read_payload(&self.event_path)?;
        parse_pull_request_event(&payload, self.repository.clone(), &self.sha)
    }
}

fn read_payload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        LintError::Context(format!(
            "could not read event payload {}: {}",
            path.display(),
            e
        ))
    })
}

/// Build a [`PullRequestContext`] from a webhook payload.
///
/// Fails with [`LintError::Context`] when the payload has no numeric
/// `pull_request.number`.
pub fn parse_pull_request_event(
    payload: &[u8],
    repo: RepoRef,
    sha: &str,
) -> Result<PullRequestContext> {
    let event: EventPayload = serde_json::from_slice(payload)
        .map_err(|e| LintError::Context(format!("invalid event payload: {}", e)))?;

    let pr = event
        .pull_request
        .ok_or_else(|| LintError::Context(NOT_A_PULL_REQUEST.to_string()))?;
    let number = pr
        .number
        .ok_or_else(|| LintError::Context(NOT_A_PULL_REQUEST.to_string()))?;

    debug!(pr = number, repo = %repo, "Resolved pull request from event payload");

    Ok(PullRequestContext {
        number,
        title: pr.title,
        body: pr.body,
        branch_name: pr.head.and_then(|h| h.ref_name),
        commit_sha: sha.to_string(),
        repo,
    })
}
