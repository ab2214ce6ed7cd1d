//! In-memory fakes for the host trait (testing only)
//!
//! `MemoryRepoHost` keeps files and issue comments in memory, records every
//! call it receives and can be told to fail a given kind of call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::{HostError, HostResult, IssueComment, RepoRef};
use crate::host::RepoHost;

/// Kind of host call, used for failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    FetchFile,
    ListComments,
    CreateComment,
    UpdateComment,
    DeleteComment,
}

/// A call received by the fake, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    FetchFile { path: String, reference: String },
    ListComments { issue_number: u64 },
    CreateComment { issue_number: u64, body: String },
    UpdateComment { comment_id: u64, body: String },
    DeleteComment { comment_id: u64 },
}

impl HostCall {
    pub fn kind(&self) -> CallKind {
        match self {
            HostCall::FetchFile { .. } => CallKind::FetchFile,
            HostCall::ListComments { .. } => CallKind::ListComments,
            HostCall::CreateComment { .. } => CallKind::CreateComment,
            HostCall::UpdateComment { .. } => CallKind::UpdateComment,
            HostCall::DeleteComment { .. } => CallKind::DeleteComment,
        }
    }

    pub fn is_mutation(&self) -> bool {
        matches!(
            self.kind(),
            CallKind::CreateComment | CallKind::UpdateComment | CallKind::DeleteComment
        )
    }
}

#[derive(Debug, Default)]
struct HostState {
    files: HashMap<String, Vec<u8>>,
    comments: HashMap<u64, Vec<IssueComment>>,
    next_comment_id: u64,
    calls: Vec<HostCall>,
    failures: HashMap<CallKind, HostError>,
}

/// In-memory repository host. Files are served for any reference.
#[derive(Debug, Default)]
pub struct MemoryRepoHost {
    state: Mutex<HostState>,
}

impl MemoryRepoHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `path`.
    pub fn with_file(self, path: &str, content: impl Into<Vec<u8>>) -> Self {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(path.to_string(), content.into());
        self
    }

    /// Seed an existing comment on `issue_number`.
    pub fn with_comment(self, issue_number: u64, body: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.next_comment_id += 1;
            let id = state.next_comment_id;
            state.comments.entry(issue_number).or_default().push(IssueComment {
                id,
                body: body.to_string(),
                html_url: None,
            });
        }
        self
    }

    /// Make every call of `kind` fail with `error`.
    pub fn failing(self, kind: CallKind, error: HostError) -> Self {
        self.state.lock().unwrap().failures.insert(kind, error);
        self
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<HostCall> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Create/update/delete calls received so far.
    pub fn mutations(&self) -> Vec<HostCall> {
        self.calls().into_iter().filter(HostCall::is_mutation).collect()
    }

    /// Current comments on `issue_number`.
    pub fn comments(&self, issue_number: u64) -> Vec<IssueComment> {
        self.state
            .lock()
            .unwrap()
            .comments
            .get(&issue_number)
            .cloned()
            .unwrap_or_default()
    }

    fn record(&self, call: HostCall) -> HostResult<()> {
        let mut state = self.state.lock().unwrap();
        let kind = call.kind();
        state.calls.push(call);
        match state.failures.get(&kind) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RepoHost for MemoryRepoHost {
    async fn fetch_file(
        &self,
        _repo: &RepoRef,
        path: &str,
        reference: &str,
    ) -> HostResult<Vec<u8>> {
        self.record(HostCall::FetchFile {
            path: path.to_string(),
            reference: reference.to_string(),
        })?;
        let state = self.state.lock().unwrap();
        state
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| HostError::NotFound(path.to_string()))
    }

    async fn list_comments(
        &self,
        _repo: &RepoRef,
        issue_number: u64,
    ) -> HostResult<Vec<IssueComment>> {
        self.record(HostCall::ListComments { issue_number })?;
        Ok(self.comments(issue_number))
    }

    async fn create_comment(
        &self,
        _repo: &RepoRef,
        issue_number: u64,
        body: &str,
    ) -> HostResult<IssueComment> {
        self.record(HostCall::CreateComment {
            issue_number,
            body: body.to_string(),
        })?;
        let mut state = self.state.lock().unwrap();
        state.next_comment_id += 1;
        let id = state.next_comment_id;
        let comment = IssueComment {
            id,
            body: body.to_string(),
            html_url: Some(format!(
                "https://example.invalid/issues/{}#issuecomment-{}",
                issue_number, id
            )),
        };
        state
            .comments
            .entry(issue_number)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        _repo: &RepoRef,
        comment_id: u64,
        body: &str,
    ) -> HostResult<()> {
        self.record(HostCall::UpdateComment {
            comment_id,
            body: body.to_string(),
        })?;
        let mut state = self.state.lock().unwrap();
        let comment = state
            .comments
            .values_mut()
            .flat_map(|thread| thread.iter_mut())
            .find(|c| c.id == comment_id)
            .ok_or_else(|| HostError::NotFound(format!("comment {}", comment_id)))?;
        comment.body = body.to_string();
        Ok(())
    }

    async fn delete_comment(&self, _repo: &RepoRef, comment_id: u64) -> HostResult<()> {
        self.record(HostCall::DeleteComment { comment_id })?;
        let mut state = self.state.lock().unwrap();
        let mut found = false;
        for thread in state.comments.values_mut() {
            let before = thread.len();
            thread.retain(|c| c.id != comment_id);
            found |= thread.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(HostError::NotFound(format!("comment {}", comment_id)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list() {
        let host = MemoryRepoHost::new();
        let repo = RepoRef::new("o", "r");
        let created = host.create_comment(&repo, 3, "hello").await.unwrap();
        let listed = host.list_comments(&repo, 3).await.unwrap();
        assert_eq!(listed, vec![created]);
        assert_eq!(host.mutations().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let host = MemoryRepoHost::new().failing(
            CallKind::ListComments,
            HostError::Transport("connection reset".to_string()),
        );
        let repo = RepoRef::new("o", "r");
        assert!(host.list_comments(&repo, 1).await.is_err());
        assert_eq!(host.calls(), vec![HostCall::ListComments { issue_number: 1 }]);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_comment() {
        let host = MemoryRepoHost::new();
        let repo = RepoRef::new("o", "r");
        assert!(host.update_comment(&repo, 99, "x").await.is_err());
        assert!(host.delete_comment(&repo, 99).await.is_err());
    }
}
