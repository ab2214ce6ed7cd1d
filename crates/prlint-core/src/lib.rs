//! prlint core - pull request linting
//!
//! Checks a pull request's title, description and branch name against a
//! rule document and keeps one feedback comment on the pull request in sync
//! with the result:
//! - `config`: load and compile the rule document
//! - `lint`: evaluate rules against the pull request fields
//! - `report`: render violations into a markdown report
//! - `feedback`: create, update or delete the marked feedback comment
//! - `orchestration`: run all of the above for one trigger event

pub mod config;
pub mod domain;
pub mod fakes;
pub mod feedback;
pub mod host;
pub mod lint;
pub mod orchestration;
pub mod report;
pub mod telemetry;

// Re-export key types
pub use config::{load_rule_set, parse_rule_set};
pub use domain::{
    HostError, HostResult, IssueComment, LintError, PullRequestContext, RepoRef, Result, Rule,
    RuleSet, Target,
};
pub use feedback::{reconcile, FeedbackAction, FEEDBACK_MARKER};
pub use host::RepoHost;
pub use lint::{evaluate, LintSubject};
pub use orchestration::{FailurePolicy, LintRun, RunInputs, RunOutcome};
pub use report::{render, CommentTemplate, ReportContext};
pub use telemetry::init_tracing;

/// prlint version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
