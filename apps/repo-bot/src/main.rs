//! `repo-bot`: issue branch creation and pull request test reports for CI

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use repo_bot::{
    branch::{branch_for_issue, LabelRules},
    event::{read_event, IssueEvent, PullRequestEvent},
    git,
    github::GitHubClient,
    report,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "repo-bot", version, about = "Repository automation for CI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a `req/` or `fix/` branch for a newly opened issue
    Branch(BranchArgs),
    /// Run a test command and report the outcome on a pull request
    TestReport(TestReportArgs),
}

#[derive(Debug, Args)]
struct BranchArgs {
    /// GitHub event payload for the issue
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Issue number (overrides the event payload)
    #[arg(long)]
    issue_number: Option<u64>,

    /// Issue title (overrides the event payload)
    #[arg(long)]
    title: Option<String>,

    /// Issue label; repeat for several (overrides the event payload)
    #[arg(long = "label")]
    labels: Vec<String>,

    /// Labels marking a requirement issue
    #[arg(long = "req-label", default_values = ["requirements"])]
    req_labels: Vec<String>,

    /// Labels marking a fix issue
    #[arg(long = "fix-label", default_values = ["bug", "fix"])]
    fix_labels: Vec<String>,

    /// Create the branch and push it
    #[arg(long)]
    push: bool,

    #[arg(long, default_value = "origin")]
    remote: String,

    /// Repository checkout to run git in
    #[arg(long, default_value = ".")]
    workdir: PathBuf,

    /// Comment the branch name on the issue
    #[arg(long)]
    comment: bool,
}

#[derive(Debug, Args)]
struct TestReportArgs {
    /// GitHub event payload for the pull request
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<PathBuf>,

    /// Pull request number (overrides the event payload)
    #[arg(long)]
    pr_number: Option<u64>,

    /// Post the report as a pull request comment
    #[arg(long)]
    comment: bool,

    /// Test command, after `--`
    #[arg(last = true, required = true)]
    command: Vec<String>,
}

/// How a subcommand finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Done,
    /// Issue carries neither a requirement nor a fix label
    Skipped,
    TestsFailed,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Done | Outcome::Skipped => ExitCode::SUCCESS,
            Outcome::TestsFailed => ExitCode::FAILURE,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(outcome) => outcome.into(),
        Err(error) => {
            eprintln!("repo-bot error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

// stdout carries the branch name, logs go to stderr
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Command::Branch(args) => branch(args).await,
        Command::TestReport(args) => test_report(args).await,
    }
}

async fn branch(args: BranchArgs) -> Result<Outcome> {
    let event = match (&args.event_path, args.issue_number, &args.title) {
        (_, Some(_), Some(_)) | (None, _, _) => None,
        (Some(path), _, _) => Some(read_event::<IssueEvent>(path)?),
    };

    let number = args
        .issue_number
        .or(event.as_ref().map(|e| e.issue.number))
        .context("issue number is required (--issue-number or --event-path)")?;
    let title = args
        .title
        .clone()
        .or(event.as_ref().map(|e| e.issue.title.clone()))
        .context("issue title is required (--title or --event-path)")?;
    let labels = if args.labels.is_empty() {
        event
            .as_ref()
            .map(|e| e.issue.label_names())
            .unwrap_or_default()
    } else {
        args.labels.clone()
    };

    let rules = LabelRules {
        requirement: args.req_labels,
        fix: args.fix_labels,
    };
    let Some(name) = branch_for_issue(&rules, number, &title, &labels) else {
        tracing::info!(issue = number, ?labels, "No requirement or fix label, skipping");
        return Ok(Outcome::Skipped);
    };

    if args.push {
        git::create_and_push(&args.workdir, &name, &args.remote).await?;
    }
    if args.comment {
        let client = GitHubClient::from_env()?;
        client
            .add_issue_comment(
                number,
                &format!("Branch `{name}` has been created for this issue."),
            )
            .await?;
    }

    println!("{name}");
    Ok(Outcome::Done)
}

async fn test_report(args: TestReportArgs) -> Result<Outcome> {
    let run = report::run_tests(&args.command).await?;
    let comment = report::render_comment(&run);

    if args.comment {
        let number = match (args.pr_number, &args.event_path) {
            (Some(n), _) => n,
            (None, Some(path)) => read_event::<PullRequestEvent>(path)?.number,
            (None, None) => anyhow::bail!("pull request number is required to comment"),
        };
        GitHubClient::from_env()?
            .add_issue_comment(number, &comment)
            .await?;
    } else {
        println!("{comment}");
    }

    Ok(if run.passed {
        Outcome::Done
    } else {
        Outcome::TestsFailed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn run_args(args: &[&str]) -> Result<Outcome> {
        let cli = Cli::try_parse_from(std::iter::once("repo-bot").chain(args.iter().copied()))
            .expect("arguments should parse");
        run(cli).await
    }

    #[tokio::test]
    async fn test_unlabelled_issue_is_skipped() {
        let outcome = run_args(&[
            "branch",
            "--issue-number",
            "1",
            "--title",
            "Question about setup",
            "--label",
            "question",
        ])
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Skipped);
    }

    #[tokio::test]
    async fn test_labelled_issue_without_push_prints_branch() {
        let outcome = run_args(&[
            "branch",
            "--issue-number",
            "12",
            "--title",
            "Add login",
            "--label",
            "Requirements",
        ])
        .await
        .unwrap();
        assert_eq!(outcome, Outcome::Done);
    }

    #[tokio::test]
    async fn test_failing_tests_exit_non_zero() {
        let outcome = run_args(&["test-report", "--", "sh", "-c", "exit 1"])
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::TestsFailed);
    }

    #[tokio::test]
    async fn test_passing_tests_exit_zero() {
        let outcome = run_args(&["test-report", "--", "sh", "-c", "exit 0"])
            .await
            .unwrap();
        assert_eq!(outcome, Outcome::Done);
    }

    #[test]
    fn test_report_requires_a_command() {
        assert!(Cli::try_parse_from(["repo-bot", "test-report"]).is_err());
    }
}
