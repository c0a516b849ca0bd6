//! Docker CLI adapter: implements the container runtime ports.
//!
//! Every call is `docker [--context C] <subcommand> ...` through an injected
//! `CommandRunner`, so argument construction is testable without Docker.

use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{
    CommandRunner, ContainerSpec, RuntimeInspector, RuntimeLifecycle, RuntimeShell,
};
use crate::domain::context::RuntimeContext;
use crate::domain::workspace::WORKSPACE_MOUNT;

/// Runtime executable invoked by default.
pub const RUNTIME_PROGRAM: &str = "docker";

/// Budget for `run` and `start`; `run` includes any image pull. The
/// running-state poll is budgeted separately.
pub const LIFECYCLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Container runtime driven through its command-line client.
pub struct DockerCli<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> DockerCli<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self::with_program(runner, RUNTIME_PROGRAM)
    }

    /// Use a different docker-compatible client binary.
    #[must_use]
    pub fn with_program(runner: R, program: &str) -> Self {
        Self {
            runner,
            program: program.to_string(),
        }
    }

    /// The command runner calls go through.
    #[must_use]
    pub fn runner(&self) -> &R {
        &self.runner
    }

    async fn invoke(&self, args: &[String]) -> Result<Output> {
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(program = %self.program, args = ?refs, "runtime call");
        self.runner.run(&self.program, &refs).await
    }

    async fn invoke_lifecycle(&self, args: &[String]) -> Result<Output> {
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::debug!(program = %self.program, args = ?refs, "runtime lifecycle call");
        self.runner
            .run_with_timeout(&self.program, &refs, LIFECYCLE_TIMEOUT)
            .await
    }
}

/// Context selection followed by the subcommand's own arguments.
fn in_context<'a>(ctx: &'a RuntimeContext, rest: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    ctx.runtime_args()
        .into_iter()
        .chain(rest)
        .map(str::to_string)
        .collect()
}

/// Arguments of `docker run` for a new detached container, after any
/// context selection.
#[must_use]
pub fn run_args(spec: &ContainerSpec<'_>) -> Vec<String> {
    let mut args = vec![
        "run".to_string(),
        "-d".to_string(),
        "--name".to_string(),
        spec.name.to_string(),
        "--hostname".to_string(),
        spec.hostname.clone(),
    ];
    for label in &spec.labels {
        args.extend(["--label".to_string(), label.clone()]);
    }
    for mount in &spec.mounts {
        args.extend(["-v".to_string(), mount.clone()]);
    }
    for env in &spec.env {
        args.extend(["-e".to_string(), env.clone()]);
    }
    if let Some(publish) = &spec.publish {
        args.extend(["-p".to_string(), publish.clone()]);
    }
    if let Some(memory) = spec.memory {
        args.extend(["--memory".to_string(), memory.to_string()]);
    }
    if let Some(cpus) = spec.cpus {
        args.extend(["--cpus".to_string(), cpus.to_string()]);
    }
    args.push(spec.image.to_string());
    args
}

impl<R: CommandRunner> RuntimeInspector for DockerCli<R> {
    async fn context_inspect(&self, name: &str) -> Result<Output> {
        self.invoke(&in_context(&RuntimeContext::default(), ["context", "inspect", name]))
            .await
    }

    async fn inspect(&self, ctx: &RuntimeContext, container: &str, format: &str) -> Result<Output> {
        let args = in_context(
            ctx,
            ["inspect", "--type", "container", "--format", format, container],
        );
        self.invoke(&args).await
    }

    async fn ps(&self, ctx: &RuntimeContext, filters: &[String], format: &str) -> Result<Output> {
        let mut args = in_context(ctx, ["ps", "-a", "--no-trunc"]);
        for filter in filters {
            args.extend(["--filter".to_string(), filter.clone()]);
        }
        args.extend(["--format".to_string(), format.to_string()]);
        self.invoke(&args).await
    }
}

impl<R: CommandRunner> RuntimeLifecycle for DockerCli<R> {
    async fn run(&self, ctx: &RuntimeContext, spec: &ContainerSpec<'_>) -> Result<Output> {
        let mut args: Vec<String> = ctx.runtime_args().into_iter().map(str::to_string).collect();
        args.extend(run_args(spec));
        self.invoke_lifecycle(&args).await
    }

    async fn start(&self, ctx: &RuntimeContext, container: &str) -> Result<Output> {
        self.invoke_lifecycle(&in_context(ctx, ["start", container]))
            .await
    }

    async fn stop(&self, ctx: &RuntimeContext, container: &str) -> Result<Output> {
        self.invoke(&in_context(ctx, ["stop", container])).await
    }

    async fn remove(&self, ctx: &RuntimeContext, container: &str, force: bool) -> Result<Output> {
        let args = if force {
            in_context(ctx, ["rm", "-f", container])
        } else {
            in_context(ctx, ["rm", container])
        };
        self.invoke(&args).await
    }
}

impl<R: CommandRunner> RuntimeShell for DockerCli<R> {
    async fn exec_status(
        &self,
        ctx: &RuntimeContext,
        container: &str,
        args: &[&str],
        interactive: bool,
    ) -> Result<ExitStatus> {
        let mut argv = in_context(ctx, ["exec", "-w", WORKSPACE_MOUNT]);
        if interactive {
            argv.push("-it".to_string());
        }
        argv.push(container.to_string());
        argv.extend(args.iter().map(|a| (*a).to_string()));
        let refs: Vec<&str> = argv.iter().map(String::as_str).collect();
        self.runner.run_status(&self.program, &refs).await
    }
}
