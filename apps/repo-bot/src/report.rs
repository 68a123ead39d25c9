//! Test run capture and pull request comment rendering

use crate::error::BotError;
use tokio::process::Command;

/// GitHub rejects comment bodies longer than this
pub const COMMENT_LIMIT: usize = 65536;

/// Longest command line echoed in the comment heading
const COMMAND_LIMIT: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestRun {
    pub command: String,
    pub passed: bool,
    pub output: String,
}

/// Run `argv` to completion, capturing stdout followed by stderr
pub async fn run_tests(argv: &[String]) -> Result<TestRun, BotError> {
    let (program, args) = argv.split_first().ok_or_else(|| BotError::Spawn {
        program: String::new(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty test command"),
    })?;

    tracing::info!(command = %argv.join(" "), "Running tests");
    let output = Command::new(program)
        .args(args)
        .output()
        .await
        .map_err(|source| BotError::Spawn {
            program: program.clone(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    let passed = output.status.success();
    tracing::info!(passed, status = %output.status, "Tests finished");
    Ok(TestRun {
        command: argv.join(" "),
        passed,
        output: combined,
    })
}

/// Markdown comment with a pass/fail marker and the (tail of the) captured output
pub fn render_comment(run: &TestRun) -> String {
    let heading = if run.passed {
        "### ✅ Tests passed"
    } else {
        "### ❌ Tests failed"
    };
    let fence = fence_for(&run.output);
    let command = if run.command.len() <= COMMAND_LIMIT {
        run.command.clone()
    } else {
        format!("{}…", head_within(&run.command, COMMAND_LIMIT))
    };
    let head = format!("{heading}\n\n`{command}`\n\n{fence}text\n");
    let tail = format!("\n{fence}\n");

    let budget = COMMENT_LIMIT.saturating_sub(head.len() + tail.len());
    let body = if run.output.len() <= budget {
        run.output.clone()
    } else {
        const NOTICE: &str = "... output truncated ...\n";
        let kept = tail_within(&run.output, budget.saturating_sub(NOTICE.len()));
        format!("{NOTICE}{kept}")
    };

    format!("{head}{body}{tail}")
}

/// A backtick fence longer than any backtick run inside `text`
fn fence_for(text: &str) -> String {
    let longest = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    "`".repeat(longest.max(2) + 1)
}

/// Longest prefix of `text` no larger than `max_bytes`, cut on a char boundary
fn head_within(text: &str, max_bytes: usize) -> &str {
    let end = (0..=max_bytes.min(text.len()))
        .rev()
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(0);
    &text[..end]
}

/// Longest suffix of `text` no larger than `max_bytes`, cut on a char boundary
fn tail_within(text: &str, max_bytes: usize) -> &str {
    let min_start = text.len().saturating_sub(max_bytes);
    let start = (min_start..=text.len())
        .find(|&i| text.is_char_boundary(i))
        .unwrap_or(text.len());
    &text[start..]
}
