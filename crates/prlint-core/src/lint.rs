//! Rule evaluation.

use crate::domain::{PullRequestContext, Rule, RuleSet, Target};

/// The pull request fields rules can target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LintSubject<'a> {
    pub title: Option<&'a str>,
    pub body: Option<&'a str>,
    pub branch: Option<&'a str>,
}

impl<'a> LintSubject<'a> {
    pub fn new(title: Option<&'a str>, body: Option<&'a str>, branch: Option<&'a str>) -> Self {
        Self {
            title,
            body,
            branch,
        }
    }

    fn field(&self, target: Target) -> Option<&'a str> {
        match target {
            Target::Title => self.title,
            Target::Body => self.body,
            Target::Branch => self.branch,
        }
    }
}

impl<'a> From<&'a PullRequestContext> for LintSubject<'a> {
    fn from(pr: &'a PullRequestContext) -> Self {
        Self {
            title: pr.field(Target::Title),
            body: pr.field(Target::Body),
            branch: pr.field(Target::Branch),
        }
    }
}

/// Message for `rule` if `subject` fails it.
pub fn check_rule(rule: &Rule, subject: &LintSubject<'_>) -> Option<String> {
    if rule.accepts(subject.field(rule.target)) {
        None
    } else {
        Some(rule.message.trim().to_string())
    }
}

/// Evaluate every rule in order and collect the messages of the failing ones.
///
/// A rule fails when its target field is absent, empty, or not matched
/// anywhere by the pattern. Duplicate messages are kept.
pub fn evaluate(rules: &RuleSet, subject: &LintSubject<'_>) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| check_rule(rule, subject))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(pattern: &str, target: Target, message: &str) -> Rule {
        Rule::new(pattern, target, message).unwrap()
    }

    fn rules(list: Vec<Rule>) -> RuleSet {
        RuleSet::new(list).unwrap()
    }

    #[test]
    fn test_conventional_title_passes() {
        let set = rules(vec![rule("^feat:", Target::Title, "Use feat:")]);
        let subject = LintSubject::new(Some("feat: add x"), None, None);
        assert!(evaluate(&set, &subject).is_empty());
    }

    #[test]
    fn test_wrong_title_prefix_fails() {
        let set = rules(vec![rule("^feat:", Target::Title, "Use feat:")]);
        let subject = LintSubject::new(Some("fix: add x"), None, None);
        assert_eq!(evaluate(&set, &subject), vec!["Use feat:".to_string()]);
    }

    #[test]
    fn test_absent_field_always_fails() {
        let set = rules(vec![
            rule(".*", Target::Body, "Body required"),
            rule("", Target::Branch, "Branch required"),
        ]);
        let subject = LintSubject::new(Some("feat: x"), None, Some(""));
        assert_eq!(
            evaluate(&set, &subject),
            vec!["Body required".to_string(), "Branch required".to_string()]
        );
    }

    #[test]
    fn test_messages_trimmed_and_order_preserved() {
        let set = rules(vec![
            rule("^b", Target::Branch, "  second  \n"),
            rule("^t", Target::Title, "\tfirst"),
            rule("^x", Target::Title, "\tfirst"),
        ]);
        let subject = LintSubject::new(Some("nope"), None, Some("nope"));
        assert_eq!(
            evaluate(&set, &subject),
            vec!["second".to_string(), "first".to_string(), "first".to_string()]
        );
    }

    #[test]
    fn test_match_anywhere_in_field() {
        let set = rules(vec![rule("#[0-9]+", Target::Body, "Link an issue")]);
        let subject = LintSubject::new(None, Some("Some text\n\nCloses #42"), None);
        assert!(evaluate(&set, &subject).is_empty());
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let set = rules(vec![
            rule("^feat", Target::Title, "a"),
            rule("x", Target::Body, "b"),
        ]);
        let subject = LintSubject::new(Some("chore"), Some("y"), None);
        assert_eq!(evaluate(&set, &subject), evaluate(&set, &subject));
    }

    #[test]
    fn test_subject_from_context() {
        use crate::domain::RepoRef;
        let pr = PullRequestContext {
            number: 1,
            title: Some("feat: x".to_string()),
            body: None,
            branch_name: Some("feature/x".to_string()),
            commit_sha: "abc".to_string(),
            repo: RepoRef::new("o", "r"),
        };
        let subject = LintSubject::from(&pr);
        assert_eq!(subject.title, Some("feat: x"));
        assert_eq!(subject.body, None);
        assert_eq!(subject.branch, Some("feature/x"));
    }
}
