//! Feedback report rendering.
//!
//! A report is the intro text, a markdown table with one row per violation,
//! the content text and an attribution footer. Placeholders in the intro,
//! the content and each table cell are substituted in a single pass:
//!
//! | placeholder | value |
//! |---|---|
//! | `{{title}}` | pull request title |
//! | `{{body}}` | pull request description |
//! | `{{branch}}` | source branch name |
//! | `{{commit}}` | commit the run was triggered for |
//! | `{{count}}` | number of violations |
//!
//! Absent or empty values render as `null`.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::lint::LintSubject;

/// Glyph shown in the first column of every violation row.
pub const VIOLATION_GLYPH: &str = ":no_entry_sign:";

/// Substituted for absent placeholder values.
pub const NULL_VALUE: &str = "null";

const TOOL_NAME: &str = "prlint";
const TOOL_URL: &str = env!("CARGO_PKG_REPOSITORY");

/// User-supplied text surrounding the violations table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentTemplate {
    /// Header of the message column.
    pub header: String,
    /// Text placed before the table.
    pub intro: String,
    /// Text placed after the table.
    pub content: String,
}

/// Values available to placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportContext<'a> {
    pub subject: LintSubject<'a>,
    pub commit: Option<&'a str>,
}

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{(title|body|branch|commit|count)\}\}").expect("placeholder regex is valid")
    })
}

fn or_null(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => NULL_VALUE,
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace("\r\n", "<br>").replace('\n', "<br>")
}

/// Cells are substituted before they are escaped, so PR fields pulled in
/// through placeholders cannot split a row.
fn render_table(header: &str, violations: &[String], ctx: &ReportContext<'_>) -> String {
    let count = violations.len();
    let cell = |text: &str| escape_cell(&substitute_placeholders(text, ctx, count));

    let mut table = format!("| | {} |\n| :-- | :-- |", cell(header));
    for message in violations {
        table.push_str(&format!("\n| {} | {} |", VIOLATION_GLYPH, cell(message)));
    }
    table
}

fn render_footer(commit: Option<&str>) -> String {
    format!(
        "<sub>Checked by [{}]({}) at commit {}</sub>",
        TOOL_NAME,
        TOOL_URL,
        or_null(commit)
    )
}

/// Replace every placeholder in `text` in one pass.
///
/// Substituted values are not scanned again, so a title containing
/// `{{body}}` is inserted literally.
pub fn substitute_placeholders(text: &str, ctx: &ReportContext<'_>, count: usize) -> String {
    placeholder_regex()
        .replace_all(text, |caps: &Captures<'_>| match &caps[1] {
            "title" => or_null(ctx.subject.title).to_string(),
            "body" => or_null(ctx.subject.body).to_string(),
            "branch" => or_null(ctx.subject.branch).to_string(),
            "commit" => or_null(ctx.commit).to_string(),
            _ => count.to_string(),
        })
        .into_owned()
}

/// Render the feedback report, or `None` when there are no violations.
pub fn render(
    violations: &[String],
    template: &CommentTemplate,
    ctx: &ReportContext<'_>,
) -> Option<String> {
    if violations.is_empty() {
        return None;
    }

    let count = violations.len();
    Some(format!(
        "{}\n\n{}\n\n{}\n\n{}",
        substitute_placeholders(&template.intro, ctx, count),
        render_table(&template.header, violations, ctx),
        substitute_placeholders(&template.content, ctx, count),
        render_footer(ctx.commit),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(intro: &str, content: &str) -> CommentTemplate {
        CommentTemplate {
            header: "Issues".to_string(),
            intro: intro.to_string(),
            content: content.to_string(),
        }
    }

    fn violations(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_violations_renders_nothing() {
        let ctx = ReportContext::default();
        assert!(render(&[], &template("Hello", "Bye"), &ctx).is_none());
        assert!(render(&[], &CommentTemplate::default(), &ctx).is_none());
    }

    #[test]
    fn test_count_placeholder() {
        let ctx = ReportContext::default();
        let report = render(
            &violations(&["a", "b"]),
            &template("Hello {{count}} issues", ""),
            &ctx,
        )
        .unwrap();
        assert!(report.starts_with("Hello 2 issues"));
    }

    #[test]
    fn test_layout_order() {
        let ctx = ReportContext {
            subject: LintSubject::default(),
            commit: Some("abc123"),
        };
        let report = render(&violations(&["Fix title"]), &template("Intro", "Outro"), &ctx).unwrap();
        let expected_table = "| | Issues |\n| :-- | :-- |\n| :no_entry_sign: | Fix title |";
        assert!(report.starts_with(&format!("Intro\n\n{}\n\nOutro\n\n", expected_table)));
        assert!(report.ends_with("at commit abc123</sub>"));
        assert!(report.contains(TOOL_URL));
    }

    #[test]
    fn test_field_placeholders_and_null_defaults() {
        let ctx = ReportContext {
            subject: LintSubject::new(Some("my title"), Some(""), None),
            commit: None,
        };
        let report = render(
            &violations(&["x"]),
            &template("{{title}} / {{body}} / {{branch}}", "{{commit}} {{title}}"),
            &ctx,
        )
        .unwrap();
        assert!(report.starts_with("my title / null / null"));
        assert!(report.contains("null my title"));
        assert!(report.contains("at commit null"));
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let ctx = ReportContext {
            subject: LintSubject::new(Some("{{body}} $1"), Some("secret"), None),
            commit: None,
        };
        let out = substitute_placeholders("T: {{title}}", &ctx, 0);
        assert_eq!(out, "T: {{body}} $1");
    }

    #[test]
    fn test_unknown_placeholder_left_alone() {
        let ctx = ReportContext::default();
        assert_eq!(substitute_placeholders("{{author}}", &ctx, 1), "{{author}}");
    }

    #[test]
    fn test_substituted_title_cannot_break_table() {
        let ctx = ReportContext {
            subject: LintSubject::new(Some("a | b\nc"), None, None),
            commit: None,
        };
        let template = CommentTemplate {
            header: "{{title}}".to_string(),
            intro: "Intro {{title}}".to_string(),
            content: String::new(),
        };
        let report = render(
            &violations(&["Title '{{title}}' is invalid"]),
            &template,
            &ctx,
        )
        .unwrap();

        let table: Vec<&str> = report.lines().filter(|l| l.starts_with('|')).collect();
        assert_eq!(
            table,
            vec![
                "| | a \\| b<br>c |",
                "| :-- | :-- |",
                "| :no_entry_sign: | Title 'a \\| b<br>c' is invalid |",
            ]
        );
        assert!(report.starts_with("Intro a | b\nc\n\n"));
    }

    #[test]
    fn test_pipes_in_messages_escaped() {
        let ctx = ReportContext::default();
        let report = render(&violations(&["a | b\nc"]), &template("", ""), &ctx).unwrap();
        assert!(report.contains("| :no_entry_sign: | a \\| b<br>c |"));
    }
}
