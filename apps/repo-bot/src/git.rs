//! Shelling out to git for branch creation

use crate::error::BotError;
use std::path::Path;
use tokio::process::Command;

/// Argument lists for creating `branch` locally and publishing it to `remote`
pub fn create_branch_args(branch: &str, remote: &str) -> [Vec<String>; 2] {
    [
        vec!["checkout".into(), "-b".into(), branch.into()],
        vec!["push".into(), "-u".into(), remote.into(), branch.into()],
    ]
}

pub async fn run_git(workdir: &Path, args: &[String]) -> Result<(), BotError> {
    tracing::debug!(?args, "running git");
    let output = Command::new("git")
        .args(args)
        .current_dir(workdir)
        .output()
        .await
        .map_err(|source| BotError::Spawn {
            program: "git".to_string(),
            source,
        })?;

    if !output.status.success() {
        return Err(BotError::Git {
            args: args.join(" "),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}

/// Create `branch` from the current HEAD and push it
pub async fn create_and_push(workdir: &Path, branch: &str, remote: &str) -> Result<(), BotError> {
    for args in create_branch_args(branch, remote) {
        run_git(workdir, &args).await?;
    }
    tracing::info!(branch, remote, "Branch created and pushed");
    Ok(())
}
