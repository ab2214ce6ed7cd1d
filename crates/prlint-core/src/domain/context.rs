//! Pull request snapshot and remote entities.

use serde::{Deserialize, Serialize};

use super::error::LintError;
use super::rule::Target;

/// Repository coordinates (`owner/name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl std::str::FromStr for RepoRef {
    type Err = LintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(RepoRef::new(owner, name))
            }
            _ => Err(LintError::Context(format!(
                "invalid repository '{}', expected owner/name",
                s
            ))),
        }
    }
}

impl std::fmt::Display for RepoRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Read-only snapshot of the pull request that triggered the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestContext {
    pub number: u64,
    pub title: Option<String>,
    pub body: Option<String>,
    pub branch_name: Option<String>,
    pub commit_sha: String,
    pub repo: RepoRef,
}

impl PullRequestContext {
    /// Value of the field a rule targets.
    pub fn field(&self, target: Target) -> Option<&str> {
        match target {
            Target::Title => self.title.as_deref(),
            Target::Body => self.body.as_deref(),
            Target::Branch => self.branch_name.as_deref(),
        }
    }
}

/// A comment on the pull request's issue thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    pub body: String,
    #[serde(default)]
    pub html_url: Option<String>,
}
