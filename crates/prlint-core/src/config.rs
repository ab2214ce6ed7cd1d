//! Rule document loading.
//!
//! The rule document is YAML:
//!
//! ```yaml
//! rules:
//!   - pattern: '^(feat|fix|chore):'
//!     target: title
//!     message: Title must start with a conventional commit type
//! ```
//!
//! Patterns are compiled here so that evaluation can never fail.

use serde::Deserialize;
use tracing::debug;

use crate::domain::{HostError, LintError, RepoRef, Result, Rule, RuleSet, Target};
use crate::host::RepoHost;

#[derive(Debug, Deserialize)]
struct RuleDocument {
    rules: Vec<RuleEntry>,
}

#[derive(Debug, Deserialize)]
struct RuleEntry {
    pattern: String,
    target: Target,
    message: String,
}

/// Parse and compile a rule document.
pub fn parse_rule_set(bytes: &[u8]) -> Result<RuleSet> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| LintError::ConfigParse(format!("document is not valid UTF-8: {}", e)))?;

    let document: RuleDocument =
        serde_yaml::from_str(text).map_err(|e| LintError::ConfigParse(e.to_string()))?;

    let mut rules = Vec::with_capacity(document.rules.len());
    for (index, entry) in document.rules.into_iter().enumerate() {
        let rule = Rule::new(&entry.pattern, entry.target, entry.message).map_err(|e| {
            LintError::ConfigParse(format!(
                "rules[{}]: invalid pattern '{}': {}",
                index, entry.pattern, e
            ))
        })?;
        rules.push(rule);
    }

    RuleSet::new(rules)
        .ok_or_else(|| LintError::ConfigParse("rules must contain at least one rule".to_string()))
}

/// Fetch the rule document at `reference` and compile it.
///
/// A missing file is reported as [`LintError::ConfigMissing`]; any other host
/// failure is a [`LintError::RemoteApi`].
pub async fn load_rule_set(
    host: &dyn RepoHost,
    repo: &RepoRef,
    path: &str,
    reference: &str,
) -> Result<RuleSet> {
    let bytes = match host.fetch_file(repo, path, reference).await {
        Ok(bytes) => bytes,
        Err(HostError::NotFound(_)) => {
            return Err(LintError::ConfigMissing {
                path: path.to_string(),
                reference: reference.to_string(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let rules = parse_rule_set(&bytes)?;
    debug!(path, reference, rules = rules.len(), "Loaded rule set");
    Ok(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryRepoHost;

    const VALID: &str = r#"
rules:
  - pattern: '^(feat|fix):'
    target: title
    message: Use a conventional title
  - pattern: '\w+'
    target: body
    message: Describe your change
  - pattern: '^feature/'
    target: branch
    message: Branch must start with feature/
"#;

    #[test]
    fn test_parse_valid_document_preserves_order() {
        let rules = parse_rule_set(VALID.as_bytes()).unwrap();
        assert_eq!(rules.len(), 3);
        let targets: Vec<Target> = rules.iter().map(|r| r.target).collect();
        assert_eq!(targets, vec![Target::Title, Target::Body, Target::Branch]);
        assert_eq!(rules.rules()[0].message, "Use a conventional title");
    }

    #[test]
    fn test_missing_rules_key() {
        let err = parse_rule_set(b"checks: []").unwrap_err();
        assert!(matches!(err, LintError::ConfigParse(_)));
    }

    #[test]
    fn test_empty_rules_rejected() {
        let err = parse_rule_set(b"rules: []").unwrap_err();
        assert!(err.to_string().contains("at least one rule"));
    }

    #[test]
    fn test_missing_message_field() {
        let doc = "rules:\n  - pattern: x\n    target: title\n";
        let err = parse_rule_set(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, LintError::ConfigParse(_)));
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let doc = "rules:\n  - pattern: x\n    target: labels\n    message: m\n";
        let err = parse_rule_set(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, LintError::ConfigParse(_)));
    }

    #[test]
    fn test_invalid_pattern_fails_at_load() {
        let doc = "rules:\n  - pattern: '(unclosed'\n    target: title\n    message: m\n";
        let err = parse_rule_set(doc.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("rules[0]"));
    }

    #[test]
    fn test_invalid_yaml() {
        let err = parse_rule_set(b"rules: [\n").unwrap_err();
        assert!(matches!(err, LintError::ConfigParse(_)));
    }

    #[test]
    fn test_non_utf8_rejected() {
        let err = parse_rule_set(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(err.to_string().contains("UTF-8"));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_config_missing() {
        let host = MemoryRepoHost::new();
        let repo = RepoRef::new("o", "r");
        let err = load_rule_set(&host, &repo, ".github/pr-lint.yml", "abc")
            .await
            .unwrap_err();
        assert!(matches!(err, LintError::ConfigMissing { .. }));
    }

    #[tokio::test]
    async fn test_load_from_host() {
        let host = MemoryRepoHost::new().with_file(".github/pr-lint.yml", VALID);
        let repo = RepoRef::new("o", "r");
        let rules = load_rule_set(&host, &repo, ".github/pr-lint.yml", "abc")
            .await
            .unwrap();
        assert_eq!(rules.len(), 3);
    }
}
