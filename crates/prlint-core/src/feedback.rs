//! Feedback comment reconciliation.
//!
//! At most one comment per pull request carries [`FEEDBACK_MARKER`]. Each run
//! lists the thread, picks the first marked comment and decides one action:
//!
//! | marked comment | report | action |
//! |---|---|---|
//! | none | none | no-op |
//! | none | some | create |
//! | some | none | delete |
//! | some | some | update (always overwritten) |
//!
//! Two runs racing on the same pull request can both decide to create; that
//! is not guarded against.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::{IssueComment, PullRequestContext, Result};
use crate::host::RepoHost;

/// Hidden token that identifies the feedback comment across runs.
pub const FEEDBACK_MARKER: &str = "<!-- ci_comment_type: body-lint -->";

const MARKER_SEPARATOR: &str = "\n\n";

/// The single remote mutation a run performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum FeedbackAction {
    NoOp,
    Create { body: String },
    Update { comment_id: u64, body: String },
    Delete { comment_id: u64 },
}

impl FeedbackAction {
    pub fn name(&self) -> &'static str {
        match self {
            FeedbackAction::NoOp => "no_op",
            FeedbackAction::Create { .. } => "create",
            FeedbackAction::Update { .. } => "update",
            FeedbackAction::Delete { .. } => "delete",
        }
    }
}

/// Comment body for a report: marker line, blank line, report.
pub fn comment_body(marker: &str, report: &str) -> String {
    format!("{}{}{}", marker, MARKER_SEPARATOR, report)
}

/// First comment in listing order whose body contains `marker`.
pub fn find_marked<'a>(comments: &'a [IssueComment], marker: &str) -> Option<&'a IssueComment> {
    comments.iter().find(|c| c.body.contains(marker))
}

/// Decide the action that makes the feedback comment match `report`.
pub fn reconcile(comments: &[IssueComment], report: Option<&str>, marker: &str) -> FeedbackAction {
    match (find_marked(comments, marker), report) {
        (None, None) => FeedbackAction::NoOp,
        (None, Some(report)) => FeedbackAction::Create {
            body: comment_body(marker, report),
        },
        (Some(existing), None) => FeedbackAction::Delete {
            comment_id: existing.id,
        },
        (Some(existing), Some(report)) => FeedbackAction::Update {
            comment_id: existing.id,
            body: comment_body(marker, report),
        },
    }
}

/// Perform `action` against the pull request's thread.
///
/// Returns the id of the feedback comment that exists afterwards, if any.
pub async fn apply(
    host: &dyn RepoHost,
    pr: &PullRequestContext,
    action: &FeedbackAction,
) -> Result<Option<u64>> {
    match action {
        FeedbackAction::NoOp => {
            debug!(pr = pr.number, "No feedback to post");
            Ok(None)
        }
        FeedbackAction::Create { body } => {
            let comment = host.create_comment(&pr.repo, pr.number, body).await?;
            info!(
                pr = pr.number,
                comment_id = comment.id,
                url = comment.html_url.as_deref().unwrap_or(""),
                "Created feedback comment"
            );
            Ok(Some(comment.id))
        }
        FeedbackAction::Update { comment_id, body } => {
            host.update_comment(&pr.repo, *comment_id, body).await?;
            info!(pr = pr.number, comment_id, "Updated feedback comment");
            Ok(Some(*comment_id))
        }
        FeedbackAction::Delete { comment_id } => {
            host.delete_comment(&pr.repo, *comment_id).await?;
            info!(pr = pr.number, comment_id, "Deleted feedback comment");
            Ok(None)
        }
    }
}
