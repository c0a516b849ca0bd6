//! Application service: target resolution pipeline.
//!
//! Turns one invocation's session options into exactly one
//! [`ResolvedTarget`], or a structured [`ResolveError`]. Resolution only
//! reads: nothing here creates, starts or removes containers.

use std::path::{Path, PathBuf};

use agentpod_common::ResolvedTarget;
use agentpod_common::labels::LabelKey;

use crate::application::ports::{ContainerRuntime, GitProbe, SocketProbe, WorkspaceFs};
use crate::application::services::contexts::searchable_contexts;
use crate::application::services::lookup::{
    find_container_across_contexts, find_workspace_container, read_container_labels,
    resolve_container_name_for_creation,
};
use crate::application::services::volume_resolver::{
    VolumeRequest, resolve_context_for_workspace, resolve_data_volume,
};
use crate::application::services::{SessionPorts, checkpoint};
use crate::domain::context::RuntimeContext;
use crate::domain::error::ResolveError;
use crate::domain::labels::ContainerLabelState;
use crate::domain::sanitize::reset_volume_name;
use crate::domain::session::SessionCommandOptions;
use crate::domain::snapshot::ConfigSnapshot;
use crate::domain::workspace::{absolutize, expand_home, workspace_key};

/// `chrono` format of the timestamp component of reset volume names (UTC).
pub const RESET_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Resolve the session target for `opts`.
///
/// # Errors
///
/// Returns a [`ResolveError`] for invalid input, an unmanaged or
/// inconsistent explicit container, an ambiguous workspace, runtime
/// failures, or cancellation.
pub async fn resolve_target<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    opts: &SessionCommandOptions,
) -> Result<ResolvedTarget, ResolveError>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    opts.validate()?;
    if opts.reset && !opts.reset_applies() {
        tracing::warn!(mode = %opts.mode, "--reset only applies to shell sessions; ignoring");
    }
    checkpoint(ports.cancel)?;
    let target = match opts.container.as_deref() {
        Some(name) => resolve_explicit(ports, opts, name).await?,
        None => resolve_workspace(ports, opts).await?,
    };
    tracing::debug!(
        container = %target.container,
        context = %target.context,
        volume = %target.data_volume,
        create = target.created_by_this_invocation,
        "resolved target"
    );
    Ok(target)
}

async fn resolve_explicit<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    opts: &SessionCommandOptions,
    name: &str,
) -> Result<ResolvedTarget, ResolveError>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    let contexts = searchable_contexts(ports.runtime, ports.snapshot, opts.force).await;
    checkpoint(ports.cancel)?;

    if let Some(context) = find_container_across_contexts(ports.runtime, name, &contexts).await? {
        checkpoint(ports.cancel)?;
        let labels = read_container_labels(ports.runtime, name, &context).await?;
        if !labels.managed {
            return Err(ResolveError::UnmanagedContainer {
                name: name.to_string(),
                mode: opts.mode,
            });
        }
        ensure_complete(name, &labels)?;
        return Ok(ResolvedTarget {
            container: name.to_string(),
            workspace: labels.workspace,
            data_volume: labels.data_volume,
            context: context.name().to_string(),
            should_persist_state: true,
            created_by_this_invocation: opts.fresh,
            generated_from_reset: false,
            replaces_existing: opts.fresh,
        });
    }

    let workspace = normalize_workspace(ports.fs, ports.snapshot, opts.workspace.as_deref());
    let volume = resolve_data_volume(
        ports.config,
        ports.fs,
        ports.snapshot,
        volume_request(&workspace, opts),
    )?;
    // Same choice resolve_context_for_workspace makes, without probing again.
    let context = contexts.into_iter().next().unwrap_or_default();
    Ok(ResolvedTarget {
        container: name.to_string(),
        workspace: workspace_key(&workspace),
        data_volume: volume.name,
        context: context.name().to_string(),
        should_persist_state: true,
        created_by_this_invocation: true,
        generated_from_reset: false,
        replaces_existing: false,
    })
}

async fn resolve_workspace<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    opts: &SessionCommandOptions,
) -> Result<ResolvedTarget, ResolveError>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    let workspace = normalize_workspace(ports.fs, ports.snapshot, opts.workspace.as_deref());
    let key = workspace_key(&workspace);

    let generated = opts.reset_applies();
    let data_volume = if generated {
        generate_reset_volume(ports, &workspace, &key).await
    } else {
        resolve_data_volume(
            ports.config,
            ports.fs,
            ports.snapshot,
            volume_request(&workspace, opts),
        )?
        .name
    };
    checkpoint(ports.cancel)?;

    let context = resolve_context_for_workspace(ports.runtime, ports.snapshot, opts.force).await;
    checkpoint(ports.cancel)?;

    if let Some(name) = find_workspace_container(ports.runtime, &key, &context).await? {
        checkpoint(ports.cancel)?;
        let labels = read_container_labels(ports.runtime, &name, &context).await?;
        ensure_complete(&name, &labels)?;
        let replaces = opts.fresh || generated;
        return Ok(ResolvedTarget {
            container: name,
            workspace: key,
            data_volume: if generated {
                data_volume
            } else {
                labels.data_volume
            },
            context: context.name().to_string(),
            should_persist_state: generated,
            created_by_this_invocation: replaces,
            generated_from_reset: generated,
            replaces_existing: replaces,
        });
    }

    checkpoint(ports.cancel)?;
    let container = resolve_container_name_for_creation(ports.runtime, &key, &context).await?;
    Ok(ResolvedTarget {
        container,
        workspace: key,
        data_volume,
        context: context.name().to_string(),
        should_persist_state: generated,
        created_by_this_invocation: true,
        generated_from_reset: generated,
        replaces_existing: false,
    })
}

/// Expand `~`, make absolute against the snapshot's cwd, and canonicalise
/// when the path exists. No argument means the current directory.
#[must_use]
pub fn normalize_workspace(
    fs: &dyn WorkspaceFs,
    snapshot: &ConfigSnapshot,
    raw: Option<&str>,
) -> PathBuf {
    let expanded = match raw {
        Some(raw) => expand_home(raw.trim(), snapshot.home.as_deref()),
        None => snapshot.cwd.clone(),
    };
    let absolute = absolutize(&expanded, &snapshot.cwd);
    fs.canonicalize(&absolute).unwrap_or(absolute)
}

/// Fresh `<repo>-<branch>-<timestamp>` volume for `shell --reset`.
async fn generate_reset_volume<R, S, G>(
    ports: &SessionPorts<'_, R, S, G>,
    workspace: &Path,
    key: &str,
) -> String
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    let branch = ports.git.current_branch(workspace).await;
    let timestamp = ports.clock.now().format(RESET_TIMESTAMP_FORMAT).to_string();
    let name = reset_volume_name(key, branch.as_deref(), &timestamp);
    tracing::debug!(volume = %name, branch = ?branch, "generated reset volume");
    name
}

fn volume_request<'a>(workspace: &'a Path, opts: &'a SessionCommandOptions) -> VolumeRequest<'a> {
    VolumeRequest {
        workspace,
        explicit_volume: opts.volume.as_deref(),
        explicit_config: opts.config.as_deref(),
    }
}

fn ensure_complete(name: &str, labels: &ContainerLabelState) -> Result<(), ResolveError> {
    let missing = labels.missing_required();
    if missing.is_empty() {
        return Ok(());
    }
    Err(ResolveError::MissingLabels {
        name: name.to_string(),
        missing: missing
            .into_iter()
            .map(LabelKey::as_str)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Runtime context named by a resolved target.
#[must_use]
pub fn target_context(target: &ResolvedTarget) -> RuntimeContext {
    RuntimeContext::named(&target.context)
}
