//! Argument construction of the Docker adapter, via a recording runner.

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::path::Path;
use std::process::{ExitStatus, Output};
use std::time::Duration;

use agentpod_cli::application::ports::{
    CommandRunner, ContainerSpec, GitProbe, RuntimeInspector, RuntimeLifecycle, RuntimeShell,
};
use agentpod_cli::domain::context::RuntimeContext;
use agentpod_cli::infra::docker::{DockerCli, LIFECYCLE_TIMEOUT};
use agentpod_cli::infra::git::GitCli;
use anyhow::Result;

use crate::helpers::{err_output, exit_status, ok_output};

/// Records every invocation and answers with a fixed output.
struct RecordingRunner {
    calls: RefCell<Vec<Vec<String>>>,
    timeouts: RefCell<Vec<Option<Duration>>>,
    reply: Output,
}

impl RecordingRunner {
    fn replying(reply: Output) -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            timeouts: RefCell::new(Vec::new()),
            reply,
        }
    }

    fn last(&self) -> Vec<String> {
        self.calls.borrow().last().cloned().expect("one call")
    }

    /// Timeout override of the last call; `None` means the runner default.
    fn last_timeout(&self) -> Option<Duration> {
        self.timeouts.borrow().last().copied().flatten()
    }

    fn record(&self, program: &str, args: &[&str], timeout: Option<Duration>) {
        self.timeouts.borrow_mut().push(timeout);
        let mut argv = vec![program.to_string()];
        argv.extend(args.iter().map(ToString::to_string));
        self.calls.borrow_mut().push(argv);
    }
}

impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None);
        Ok(self.reply.clone())
    }

    async fn run_with_timeout(&self, program: &str, args: &[&str], timeout: Duration) -> Result<Output> {
        self.record(program, args, Some(timeout));
        Ok(self.reply.clone())
    }

    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        self.record(program, args, None);
        Ok(exit_status(0))
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

#[tokio::test]
async fn default_context_adds_no_context_flag() {
    let docker = DockerCli::new(RecordingRunner::replying(ok_output(b"")));

    docker
        .inspect(&RuntimeContext::default(), "app", "{{.Name}}")
        .await
        .expect("runs");

    assert_eq!(
        docker_calls(&docker),
        argv(&["docker", "inspect", "--type", "container", "--format", "{{.Name}}", "app"])
    );
}

#[tokio::test]
async fn alternate_context_is_selected_first() {
    let docker = DockerCli::new(RecordingRunner::replying(ok_output(b"")));

    docker
        .ps(
            &RuntimeContext::named("rootless"),
            &["label=agentpod.managed=true".to_string()],
            "{{.Names}}",
        )
        .await
        .expect("runs");

    assert_eq!(
        docker_calls(&docker),
        argv(&[
            "docker", "--context", "rootless", "ps", "-a", "--no-trunc", "--filter",
            "label=agentpod.managed=true", "--format", "{{.Names}}",
        ])
    );
}

#[tokio::test]
async fn run_passes_every_spec_field() {
    let docker = DockerCli::new(RecordingRunner::replying(ok_output(b"id\n")));
    let spec = ContainerSpec {
        name: "app",
        hostname: "app".to_string(),
        image: "ghcr.io/agentpod/base:stable",
        labels: vec!["agentpod.managed=true".to_string()],
        mounts: vec!["vol:/data".to_string()],
        env: vec!["TZ=UTC".to_string()],
        publish: Some("127.0.0.1:2220:22".to_string()),
        memory: Some("4g"),
        cpus: None,
    };

    docker
        .run(&RuntimeContext::default(), &spec)
        .await
        .expect("runs");

    assert_eq!(
        docker_calls(&docker),
        argv(&[
            "docker", "run", "-d", "--name", "app", "--hostname", "app", "--label",
            "agentpod.managed=true", "-v", "vol:/data", "-e", "TZ=UTC", "-p",
            "127.0.0.1:2220:22", "--memory", "4g", "ghcr.io/agentpod/base:stable",
        ])
    );
}

#[tokio::test]
async fn create_and_start_get_the_lifecycle_budget() {
    let docker = DockerCli::new(RecordingRunner::replying(ok_output(b"")));
    let ctx = RuntimeContext::default();
    let spec = ContainerSpec {
        name: "app",
        hostname: "app".to_string(),
        image: "ghcr.io/agentpod/base:stable",
        labels: Vec::new(),
        mounts: Vec::new(),
        env: Vec::new(),
        publish: None,
        memory: None,
        cpus: None,
    };

    docker.run(&ctx, &spec).await.expect("runs");
    assert_eq!(docker.runner().last_timeout(), Some(LIFECYCLE_TIMEOUT));

    docker.start(&ctx, "app").await.expect("runs");
    assert_eq!(docker.runner().last_timeout(), Some(LIFECYCLE_TIMEOUT));

    docker
        .inspect(&ctx, "app", "{{.State.Status}}")
        .await
        .expect("runs");
    assert_eq!(docker.runner().last_timeout(), None);
}

#[tokio::test]
async fn remove_force_and_exec_interactive_flags() {
    let docker = DockerCli::new(RecordingRunner::replying(ok_output(b"")));
    let ctx = RuntimeContext::default();

    docker.remove(&ctx, "app", true).await.expect("runs");
    assert_eq!(docker_calls(&docker), argv(&["docker", "rm", "-f", "app"]));

    docker
        .exec_status(&ctx, "app", &["bash", "-l"], true)
        .await
        .expect("runs");
    assert_eq!(
        docker_calls(&docker),
        argv(&["docker", "exec", "-w", "/workspace", "-it", "app", "bash", "-l"])
    );
}

#[tokio::test]
async fn git_probe_reads_branch_and_treats_head_as_detached() {
    let git = GitCli::new(RecordingRunner::replying(ok_output(b"main\n")));
    assert_eq!(git.current_branch(Path::new("/repo/app")).await, Some("main".to_string()));

    let detached = GitCli::new(RecordingRunner::replying(ok_output(b"HEAD\n")));
    assert_eq!(detached.current_branch(Path::new("/repo/app")).await, None);

    let not_a_repo = GitCli::new(RecordingRunner::replying(err_output(128, b"fatal: not a git repository")));
    assert_eq!(not_a_repo.current_branch(Path::new("/tmp")).await, None);
}

fn docker_calls(docker: &DockerCli<RecordingRunner>) -> Vec<String> {
    docker.runner().last()
}
