//! Lint rules and rule sets.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Pull request field a rule is checked against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Title,
    Body,
    Branch,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Title => "title",
            Target::Body => "body",
            Target::Branch => "branch",
        }
    }
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled (pattern, target, message) triple.
#[derive(Debug, Clone)]
pub struct Rule {
    pub pattern: Regex,
    pub target: Target,
    pub message: String,
}

impl Rule {
    /// Compile a rule from its pattern source.
    pub fn new(
        pattern: &str,
        target: Target,
        message: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            target,
            message: message.into(),
        })
    }

    /// True when `value` is present, non-empty and matched by the pattern.
    pub fn accepts(&self, value: Option<&str>) -> bool {
        match value {
            Some(v) if !v.is_empty() => self.pattern.is_match(v),
            _ => false,
        }
    }
}

/// Ordered, non-empty sequence of rules.
///
/// Only constructed through [`RuleSet::new`] or the loader, both of which
/// reject an empty list.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Returns `None` when `rules` is empty.
    pub fn new(rules: Vec<Rule>) -> Option<Self> {
        if rules.is_empty() {
            None
        } else {
            Some(Self { rules })
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
