//! prlint - pull request gatekeeper
//!
//! ## Commands
//!
//! - `run`: lint the triggering pull request inside GitHub Actions and keep
//!   the feedback comment in sync
//! - `check`: lint a title/body/branch locally against a rule file
//!
//! Every action input can be passed as a flag or through the `INPUT_*`
//! variable the Actions runner exports for it. Inputs are checked inside the
//! run rather than by the parser, so a missing one still ends in `::error::`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use prlint_core::{
    evaluate, parse_rule_set, render, CommentTemplate, FailurePolicy, LintRun, LintSubject,
    ReportContext, RunInputs,
};
use prlint_github::{ActionContext, GitHubClient, GitHubConfig, DEFAULT_API_URL};
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "prlint")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Lint pull request titles, descriptions and branch names", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint the triggering pull request and post feedback (GitHub Actions)
    Run(RunArgs),

    /// Lint values locally against a rule file, without any API calls
    Check(CheckArgs),
}

#[derive(Args)]
struct CommentArgs {
    /// Header of the violations table
    #[arg(
        long,
        alias = "comment-table-header",
        env = "INPUT_COMMENT-TITLE",
        default_value = ""
    )]
    comment_title: String,

    /// Text placed before the violations table
    #[arg(long, env = "INPUT_COMMENT-INTRO", default_value = "")]
    comment_intro: String,

    /// Text placed after the violations table
    #[arg(
        long,
        alias = "comment-body",
        env = "INPUT_COMMENT-CONTENT",
        default_value = ""
    )]
    comment_content: String,
}

impl CommentArgs {
    fn template(&self) -> CommentTemplate {
        CommentTemplate {
            header: self.comment_title.clone(),
            intro: self.comment_intro.clone(),
            content: self.comment_content.clone(),
        }
    }
}

#[derive(Args)]
struct RunArgs {
    /// Token for the GitHub API
    #[arg(long, env = "INPUT_REPO-TOKEN", hide_env_values = true, default_value = "")]
    repo_token: String,

    /// Repository-relative path of the rule document
    #[arg(long, env = "INPUT_CONFIGURATION-PATH", default_value = "")]
    configuration_path: String,

    #[command(flatten)]
    comment: CommentArgs,

    /// Fail the run when violations are found, after posting feedback
    #[arg(
        long,
        env = "INPUT_FAIL-ON-VIOLATIONS",
        default_value = "false",
        action = clap::ArgAction::Set,
        value_parser = parse_flag
    )]
    fail_on_violations: bool,

    /// Webhook payload of the triggering event
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Repository in owner/name form
    #[arg(long, env = "GITHUB_REPOSITORY", default_value = "")]
    repository: String,

    /// Commit the workflow was triggered for
    #[arg(long, env = "GITHUB_SHA", default_value = "")]
    sha: String,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    api_url: String,
}

#[derive(Args)]
struct CheckArgs {
    /// Local rule document
    #[arg(short, long)]
    config: PathBuf,

    /// Pull request title
    #[arg(long)]
    title: Option<String>,

    /// Pull request description
    #[arg(long)]
    body: Option<String>,

    /// Source branch name
    #[arg(long)]
    branch: Option<String>,

    /// Commit shown in the report
    #[arg(long)]
    commit: Option<String>,

    #[arg(long, default_value = "Problem")]
    comment_title: String,

    #[arg(long, default_value = "Found {{count}} problem(s) with this pull request.")]
    comment_intro: String,

    #[arg(long, default_value = "")]
    comment_content: String,
}

/// Boolean action input. Empty (input declared but not set) is false.
fn parse_flag(value: &str) -> std::result::Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" | "off" => Ok(false),
        "true" | "1" | "yes" | "on" => Ok(true),
        other => Err(format!("expected true or false, got '{}'", other)),
    }
}

/// Message for the `::error::` workflow command.
fn failure_message(err: &anyhow::Error) -> String {
    let message = format!("{:#}", err);
    if message.trim().is_empty() {
        "Unknown error".to_string()
    } else {
        message
    }
}

/// Escape data for a workflow command so it stays on one line.
fn escape_command_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

async fn run(args: RunArgs) -> Result<bool> {
    if args.repo_token.trim().is_empty() {
        anyhow::bail!("Input required and not supplied: repo-token");
    }
    let inputs = RunInputs::new(args.configuration_path, args.comment.template())
        .with_policy(FailurePolicy::from_fail_on_violations(args.fail_on_violations));
    inputs.validate()?;

    let event_path = args
        .event_path
        .filter(|p| !p.as_os_str().is_empty())
        .context("GITHUB_EVENT_PATH is not set")?;
    let context = ActionContext::new(event_path, &args.repository, &args.sha)?;
    let pr = context.pull_request_context()?;

    let client = GitHubClient::new(GitHubConfig::new(&args.repo_token).with_api_url(&args.api_url))
        .context("Failed to create GitHub client")?;

    let outcome = LintRun::execute(&client, &pr, &inputs).await?;

    info!(
        pr = outcome.pr_number,
        violations = outcome.violation_count(),
        action = outcome.action.name(),
        "Lint run finished"
    );

    if !outcome.passed {
        println!(
            "::error::{}",
            escape_command_data(&format!(
                "Pull request #{} has {} lint violation(s)",
                outcome.pr_number,
                outcome.violation_count()
            ))
        );
    }
    Ok(outcome.passed)
}

fn check(args: CheckArgs) -> Result<bool> {
    let bytes = std::fs::read(&args.config)
        .with_context(|| format!("Failed to read {}", args.config.display()))?;
    let rules = parse_rule_set(&bytes)?;

    let subject = LintSubject::new(
        args.title.as_deref(),
        args.body.as_deref(),
        args.branch.as_deref(),
    );
    let violations = evaluate(&rules, &subject);

    let template = CommentTemplate {
        header: args.comment_title,
        intro: args.comment_intro,
        content: args.comment_content,
    };
    let ctx = ReportContext {
        subject,
        commit: args.commit.as_deref(),
    };

    match render(&violations, &template, &ctx) {
        Some(report) => {
            println!("{}", report);
            Ok(false)
        }
        None => {
            println!("No violations ({} rules checked)", rules.len());
            Ok(true)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    prlint_core::init_tracing(cli.json, level);

    let result = match cli.command {
        Commands::Run(args) => run(args).await,
        Commands::Check(args) => check(args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            let message = failure_message(&err);
            error!(error = %message, "prlint failed");
            println!("::error::{}", escape_command_data(&message));
            ExitCode::FAILURE
        }
    }
}
