//! Git probe: implements `GitProbe` with a bounded `git rev-parse`.

use std::path::Path;
use std::time::Duration;

use crate::application::ports::{CommandRunner, GitProbe};

/// Upper bound on the branch query; the reset flow never waits longer.
pub const GIT_TIMEOUT: Duration = Duration::from_secs(2);

pub struct GitCli<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> GitCli<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> GitProbe for GitCli<R> {
    async fn current_branch(&self, workspace: &Path) -> Option<String> {
        let dir = workspace.to_string_lossy();
        let output = self
            .runner
            .run_with_timeout(
                "git",
                &["-C", &dir, "rev-parse", "--abbrev-ref", "HEAD"],
                GIT_TIMEOUT,
            )
            .await;
        match output {
            Ok(output) if output.status.success() => {
                parse_branch(&String::from_utf8_lossy(&output.stdout))
            }
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "git branch query failed");
                None
            }
        }
    }
}

/// `rev-parse --abbrev-ref HEAD` prints `HEAD` when detached.
fn parse_branch(stdout: &str) -> Option<String> {
    let branch = stdout.trim();
    (!branch.is_empty() && branch != "HEAD").then(|| branch.to_string())
}
