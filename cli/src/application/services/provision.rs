//! Application service: container provisioning.
//!
//! Turns a resolved target into a running container with a published SSH
//! port: create, start, or leave alone.

use std::time::Duration;

use agentpod_common::labels::{LabelKey, MANAGED_VALUE};
use agentpod_common::{ProvisionAction, ProvisionReport, ResolvedTarget};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    ContainerRuntime, ContainerSpec, GitProbe, ProgressReporter, RuntimeInspector, SocketProbe,
};
use crate::application::services::lookup::{ContainerState, container_state, read_container_labels};
use crate::application::services::port_alloc::allocate_ssh_port;
use crate::application::services::resolve::target_context;
use crate::application::services::{SessionPorts, checkpoint};
use crate::domain::config::AgentpodConfig;
use crate::domain::context::RuntimeContext;
use crate::domain::error::ResolveError;
use crate::domain::sanitize::{FALLBACK_NAME, sanitize_hostname};
use crate::domain::session::SessionCommandOptions;
use crate::domain::snapshot::ConfigSnapshot;
use crate::domain::workspace::{DATA_MOUNT, WORKSPACE_MOUNT};

/// Registry and repository prefix of the stock session images.
pub const IMAGE_REPOSITORY: &str = "ghcr.io/agentpod";
pub const DEFAULT_TEMPLATE: &str = "base";
pub const DEFAULT_CHANNEL: &str = "stable";

/// Environment variable carrying the host workspace path into the container.
pub const HOST_WORKSPACE_ENV: &str = "AGENTPOD_HOST_WORKSPACE";

/// Address the SSH port is published on.
const PUBLISH_ADDRESS: &str = "127.0.0.1";
const CONTAINER_SSH_PORT: u16 = 22;

/// How long and how often to wait for a new container to report `running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningPoll {
    pub interval: Duration,
    pub budget: Duration,
}

impl Default for RunningPoll {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(500),
            budget: Duration::from_secs(30),
        }
    }
}

/// Image and resource settings for new containers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionOptions {
    pub image: String,
    pub memory: Option<String>,
    pub cpus: Option<String>,
    pub poll: RunningPoll,
}

/// Pick image and limits: flag, then user config defaults, then built-ins.
#[must_use]
pub fn provision_options(opts: &SessionCommandOptions, config: &AgentpodConfig) -> ProvisionOptions {
    let image = opts
        .image
        .clone()
        .or_else(|| config.defaults.image.clone())
        .unwrap_or_else(|| {
            default_image(
                opts.template.as_deref().unwrap_or(DEFAULT_TEMPLATE),
                opts.channel.as_deref().unwrap_or(DEFAULT_CHANNEL),
            )
        });
    ProvisionOptions {
        image,
        memory: opts.memory.clone().or_else(|| config.defaults.memory.clone()),
        cpus: opts.cpus.clone().or_else(|| config.defaults.cpus.clone()),
        poll: RunningPoll::default(),
    }
}

/// `ghcr.io/agentpod/<template>:<channel>`
#[must_use]
pub fn default_image(template: &str, channel: &str) -> String {
    format!("{IMAGE_REPOSITORY}/{template}:{channel}")
}

/// Make `target` usable.
///
/// # Errors
///
/// Returns [`ResolveError::Runtime`] if the runtime rejects create, start or
/// remove, [`ResolveError::NotRunning`] if a new container does not reach
/// `running` within the poll budget, [`ResolveError::PortsExhausted`], or
/// [`ResolveError::Cancelled`].
pub async fn provision<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    target: &ResolvedTarget,
    options: &ProvisionOptions,
    reporter: &impl ProgressReporter,
) -> Result<ProvisionReport, ResolveError>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    checkpoint(ports.cancel)?;
    let ctx = target_context(target);
    if target.created_by_this_invocation {
        return create_container(ports, &ctx, target, options, reporter).await;
    }

    match container_state(ports.runtime, &ctx, &target.container).await? {
        ContainerState::Running => {
            let labels = read_container_labels(ports.runtime, &target.container, &ctx).await?;
            tracing::debug!(container = %target.container, "already running");
            let ssh_port = labels.ssh_port();
            Ok(ProvisionReport {
                action: ProvisionAction::AlreadyRunning,
                ssh_port,
                ssh_port_published: ssh_port.is_some(),
            })
        }
        ContainerState::Stopped(status) => {
            let labels = read_container_labels(ports.runtime, &target.container, &ctx).await?;
            let (port, published) = match labels.ssh_port() {
                Some(port) => (port, true),
                None => {
                    let port = allocate_ssh_port(ports.runtime, ports.sockets, &ctx).await?;
                    tracing::warn!(
                        container = %target.container,
                        port,
                        "container has no ssh port label; the allocated port is not published"
                    );
                    (port, false)
                }
            };
            checkpoint(ports.cancel)?;
            reporter.step(&format!("starting {}...", target.container));
            tracing::debug!(container = %target.container, %status, port, "starting container");
            let output = ports.runtime.start(&ctx, &target.container).await?;
            if !output.status.success() {
                return Err(ResolveError::runtime(
                    &format!("starting {}", target.container),
                    &output.stderr,
                ));
            }
            reporter.success(&format!("{} started", target.container));
            Ok(ProvisionReport {
                action: ProvisionAction::Started,
                ssh_port: Some(port),
                ssh_port_published: published,
            })
        }
        ContainerState::NotFound => Err(ResolveError::Runtime {
            action: format!("provisioning {}", target.container),
            message: "container no longer exists".to_string(),
        }),
    }
}

async fn create_container<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    ctx: &RuntimeContext,
    target: &ResolvedTarget,
    options: &ProvisionOptions,
    reporter: &impl ProgressReporter,
) -> Result<ProvisionReport, ResolveError>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    if target.replaces_existing {
        reporter.step(&format!("removing existing {}...", target.container));
        let output = ports.runtime.remove(ctx, &target.container, true).await?;
        if !output.status.success() {
            return Err(ResolveError::runtime(
                &format!("removing {}", target.container),
                &output.stderr,
            ));
        }
        checkpoint(ports.cancel)?;
    }

    let port = allocate_ssh_port(ports.runtime, ports.sockets, ctx).await?;
    checkpoint(ports.cancel)?;

    let spec = container_spec(target, options, port, ports.snapshot);
    reporter.step(&format!("creating {} ({})...", target.container, options.image));
    tracing::debug!(
        container = %target.container,
        context = %ctx,
        image = %options.image,
        volume = %target.data_volume,
        port,
        "creating container"
    );
    let output = ports.runtime.run(ctx, &spec).await?;
    if !output.status.success() {
        return Err(ResolveError::runtime(
            &format!("creating {}", target.container),
            &output.stderr,
        ));
    }

    reporter.step(&format!("waiting for {} to start...", target.container));
    wait_until_running(ports.runtime, ctx, &target.container, options.poll, ports.cancel).await?;
    reporter.success(&format!("{} is running", target.container));
    Ok(ProvisionReport {
        action: ProvisionAction::Created,
        ssh_port: Some(port),
        ssh_port_published: true,
    })
}

/// Runtime invocation for a new container.
#[must_use]
pub fn container_spec<'a>(
    target: &'a ResolvedTarget,
    options: &'a ProvisionOptions,
    port: u16,
    snapshot: &ConfigSnapshot,
) -> ContainerSpec<'a> {
    let hostname = sanitize_hostname(&target.container);
    let mut env = vec![format!("{HOST_WORKSPACE_ENV}={}", target.workspace)];
    if let Some(tz) = &snapshot.timezone {
        env.push(format!("TZ={tz}"));
    }
    ContainerSpec {
        name: &target.container,
        hostname: if hostname.is_empty() {
            FALLBACK_NAME.to_string()
        } else {
            hostname
        },
        image: &options.image,
        labels: vec![
            LabelKey::Managed.assign(MANAGED_VALUE),
            LabelKey::Workspace.assign(&target.workspace),
            LabelKey::DataVolume.assign(&target.data_volume),
            LabelKey::SshPort.assign(&port.to_string()),
        ],
        mounts: vec![
            format!("{}:{DATA_MOUNT}", target.data_volume),
            format!("{}:{WORKSPACE_MOUNT}", target.workspace),
        ],
        env,
        publish: Some(format!("{PUBLISH_ADDRESS}:{port}:{CONTAINER_SSH_PORT}")),
        memory: options.memory.as_deref(),
        cpus: options.cpus.as_deref(),
    }
}

/// Poll until `name` reports `running`, the budget runs out, or `cancel` fires.
///
/// # Errors
///
/// Returns [`ResolveError::NotRunning`] on timeout and
/// [`ResolveError::Cancelled`] on cancellation.
pub async fn wait_until_running(
    runtime: &impl RuntimeInspector,
    ctx: &RuntimeContext,
    name: &str,
    poll: RunningPoll,
    cancel: &CancellationToken,
) -> Result<(), ResolveError> {
    let started = Instant::now();
    loop {
        if container_state(runtime, ctx, name).await? == ContainerState::Running {
            return Ok(());
        }
        if started.elapsed() >= poll.budget {
            return Err(ResolveError::NotRunning {
                name: name.to_string(),
                secs: poll.budget.as_secs(),
            });
        }
        tokio::select! {
            () = cancel.cancelled() => return Err(ResolveError::Cancelled),
            () = tokio::time::sleep(poll.interval) => {}
        }
    }
}
