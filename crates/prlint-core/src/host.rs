//! Remote repository host abstraction.
//!
//! `RepoHost` covers the content and issue-comment calls a lint run makes.
//! Every call is a single attempt; failures are returned as [`HostError`]
//! and never retried. An in-memory implementation lives in [`crate::fakes`].
//!
//! [`HostError`]: crate::domain::HostError

use async_trait::async_trait;

use crate::domain::{HostResult, IssueComment, RepoRef};

#[async_trait]
pub trait RepoHost: Send + Sync {
    /// Raw bytes of `path` at `reference`. `HostError::NotFound` if absent.
    async fn fetch_file(&self, repo: &RepoRef, path: &str, reference: &str)
        -> HostResult<Vec<u8>>;

    /// All comments on the issue thread, in listing order.
    async fn list_comments(&self, repo: &RepoRef, issue_number: u64)
        -> HostResult<Vec<IssueComment>>;

    async fn create_comment(
        &self,
        repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> HostResult<IssueComment>;

    async fn update_comment(&self, repo: &RepoRef, comment_id: u64, body: &str) -> HostResult<()>;

    async fn delete_comment(&self, repo: &RepoRef, comment_id: u64) -> HostResult<()>;
}
