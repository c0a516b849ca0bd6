//! Application service: session orchestration around a resolved target.
//!
//! Attaching to the container, and the attach-only lifecycle helpers used
//! by `stop` and `rm`.

use agentpod_common::{ResolvedTarget, SessionMode};

use crate::application::ports::{ContainerRuntime, GitProbe, SocketProbe};
use crate::application::services::resolve::{resolve_target, target_context};
use crate::application::services::SessionPorts;
use crate::domain::error::ResolveError;
use crate::domain::session::SessionCommandOptions;

/// Command run by `agentpod run` when none is given.
pub const DEFAULT_AGENT_COMMAND: &str = "agent";

/// Login shell opened by `agentpod shell`.
pub const LOGIN_SHELL: [&str; 2] = ["bash", "-l"];

/// What to execute inside the session container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachCommand {
    pub args: Vec<String>,
    /// Allocate a terminal and keep stdin open.
    pub interactive: bool,
}

/// The in-container command for a session mode.
#[must_use]
pub fn attach_command(opts: &SessionCommandOptions) -> AttachCommand {
    match opts.mode {
        SessionMode::Shell => AttachCommand {
            args: LOGIN_SHELL.iter().map(ToString::to_string).collect(),
            interactive: true,
        },
        SessionMode::Exec => AttachCommand {
            args: opts.command.clone(),
            interactive: false,
        },
        SessionMode::Run if opts.command.is_empty() => AttachCommand {
            args: vec![DEFAULT_AGENT_COMMAND.to_string()],
            interactive: true,
        },
        SessionMode::Run => AttachCommand {
            args: opts.command.clone(),
            interactive: true,
        },
    }
}

/// Run `command` in the target container; returns the child's exit code.
///
/// # Errors
///
/// Returns [`ResolveError::External`] if the runtime cannot be invoked.
pub async fn attach(
    runtime: &impl ContainerRuntime,
    target: &ResolvedTarget,
    command: &AttachCommand,
) -> Result<i32, ResolveError> {
    let args: Vec<&str> = command.args.iter().map(String::as_str).collect();
    tracing::debug!(container = %target.container, ?args, "attaching");
    let status = runtime
        .exec_status(&target_context(target), &target.container, &args, command.interactive)
        .await?;
    Ok(status.code().unwrap_or(1))
}

/// Resolve a target that must already exist. Never plans a creation.
///
/// # Errors
///
/// Returns [`ResolveError::NoSession`] when nothing exists to act on, plus
/// every error of [`resolve_target`].
pub async fn resolve_existing<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    opts: &SessionCommandOptions,
) -> Result<ResolvedTarget, ResolveError>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    let opts = SessionCommandOptions {
        fresh: false,
        reset: false,
        ..opts.clone()
    };
    let target = resolve_target(ports, &opts).await?;
    if target.created_by_this_invocation {
        let subject = opts.container.unwrap_or(target.workspace);
        return Err(ResolveError::NoSession(subject));
    }
    Ok(target)
}

/// Stop the target container.
///
/// # Errors
///
/// Returns [`ResolveError::Runtime`] if the runtime refuses.
pub async fn stop_container(
    runtime: &impl ContainerRuntime,
    target: &ResolvedTarget,
) -> Result<(), ResolveError> {
    let output = runtime
        .stop(&target_context(target), &target.container)
        .await?;
    if !output.status.success() {
        return Err(ResolveError::runtime(
            &format!("stopping {}", target.container),
            &output.stderr,
        ));
    }
    Ok(())
}

/// Force-remove the target container. Its data volume is left alone.
///
/// # Errors
///
/// Returns [`ResolveError::Runtime`] if the runtime refuses.
pub async fn remove_container(
    runtime: &impl ContainerRuntime,
    target: &ResolvedTarget,
) -> Result<(), ResolveError> {
    let output = runtime
        .remove(&target_context(target), &target.container, true)
        .await?;
    if !output.status.success() {
        return Err(ResolveError::runtime(
            &format!("removing {}", target.container),
            &output.stderr,
        ));
    }
    Ok(())
}
