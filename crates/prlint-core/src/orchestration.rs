//! Lint run orchestration.
//!
//! Load rules, evaluate, render, list comments, reconcile and apply, in that
//! order. Any error aborts the run; the caller is the single catch boundary.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::load_rule_set;
use crate::domain::{LintError, PullRequestContext, Result};
use crate::feedback::{self, FeedbackAction, FEEDBACK_MARKER};
use crate::host::RepoHost;
use crate::lint::{evaluate, LintSubject};
use crate::report::{render, CommentTemplate, ReportContext};

/// Whether violations fail the run once feedback has been posted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Posting feedback is a successful run.
    #[default]
    Advisory,
    /// Post feedback, then fail the run if there were violations.
    Blocking,
}

impl FailurePolicy {
    pub fn from_fail_on_violations(fail: bool) -> Self {
        if fail {
            FailurePolicy::Blocking
        } else {
            FailurePolicy::Advisory
        }
    }
}

/// Per-run inputs supplied by the CI host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInputs {
    /// Repository-relative path of the rule document.
    pub config_path: String,
    pub template: CommentTemplate,
    pub policy: FailurePolicy,
    pub marker: String,
}

impl RunInputs {
    pub fn new(config_path: impl Into<String>, template: CommentTemplate) -> Self {
        Self {
            config_path: config_path.into(),
            template,
            policy: FailurePolicy::default(),
            marker: FEEDBACK_MARKER.to_string(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Reject required inputs that are present but empty.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("configuration-path", &self.config_path),
            ("comment-title", &self.template.header),
            ("comment-intro", &self.template.intro),
            ("comment-content", &self.template.content),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(LintError::InvalidInput(format!(
                    "Input required and not supplied: {}",
                    name
                )));
            }
        }
        if self.marker.is_empty() {
            return Err(LintError::InvalidInput("feedback marker must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Result of a completed lint run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub pr_number: u64,
    /// Violation messages in rule order.
    pub violations: Vec<String>,
    /// Action applied to the feedback comment.
    pub action: FeedbackAction,
    /// Feedback comment present after the run.
    pub comment_id: Option<u64>,
    /// Whether the run should be reported as successful.
    pub passed: bool,
}

impl RunOutcome {
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }
}

/// Lint run orchestrator.
pub struct LintRun;

impl LintRun {
    /// Lint `pr` and reconcile its feedback comment.
    ///
    /// The rule document is read at the pull request's commit. Comments are
    /// listed only after the report is rendered, right before the mutation.
    pub async fn execute(
        host: &dyn RepoHost,
        pr: &PullRequestContext,
        inputs: &RunInputs,
    ) -> Result<RunOutcome> {
        inputs.validate()?;

        info!(
            pr = pr.number,
            repo = %pr.repo,
            commit = %pr.commit_sha,
            config = %inputs.config_path,
            "Starting lint run"
        );

        let rules = load_rule_set(host, &pr.repo, &inputs.config_path, &pr.commit_sha).await?;

        let subject = LintSubject::from(pr);
        let violations = evaluate(&rules, &subject);
        info!(
            pr = pr.number,
            rules = rules.len(),
            violations = violations.len(),
            "Evaluated rules"
        );

        let ctx = ReportContext {
            subject,
            commit: Some(pr.commit_sha.as_str()),
        };
        let report = render(&violations, &inputs.template, &ctx);

        let comments = host.list_comments(&pr.repo, pr.number).await?;
        let action = feedback::reconcile(&comments, report.as_deref(), &inputs.marker);
        info!(pr = pr.number, action = action.name(), "Reconciling feedback comment");

        let comment_id = feedback::apply(host, pr, &action).await?;

        let passed = match inputs.policy {
            FailurePolicy::Advisory => true,
            FailurePolicy::Blocking => violations.is_empty(),
        };
        if !passed {
            warn!(
                pr = pr.number,
                violations = violations.len(),
                "Pull request has lint violations"
            );
        }

        Ok(RunOutcome {
            pr_number: pr.number,
            violations,
            action,
            comment_id,
            passed,
        })
    }
}
