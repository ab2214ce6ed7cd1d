//! Domain models for prlint.
//!
//! - `Rule` / `RuleSet`: compiled lint rules, in document order
//! - `PullRequestContext`: the pull request being checked
//! - `IssueComment`: a comment on the pull request thread

pub mod context;
pub mod error;
pub mod rule;

pub use context::{IssueComment, PullRequestContext, RepoRef};
pub use error::{HostError, HostResult, LintError, Result};
pub use rule::{Rule, RuleSet, Target};
