//! Application service: container lookup.
//!
//! Finds containers by explicit name or by workspace label, reads their
//! labels, and picks collision-free names for new ones.

use std::collections::{BTreeSet, HashMap};

use agentpod_common::labels::{LabelKey, MANAGED_VALUE};

use crate::application::ports::RuntimeInspector;
use crate::domain::context::RuntimeContext;
use crate::domain::error::ResolveError;
use crate::domain::labels::ContainerLabelState;
use crate::domain::sanitize::{collision_suffix, container_base_name, with_suffix};

/// Attempts at a suffixed name before giving up on creation.
pub const MAX_NAME_ATTEMPTS: u32 = 8;

/// Observed lifecycle state of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    /// Exists but is not running; carries the runtime's status word.
    Stopped(String),
    NotFound,
}

/// Whether a container called `name` exists in `ctx`.
///
/// # Errors
///
/// Returns [`ResolveError::External`] if the runtime cannot be invoked at all.
pub async fn container_exists(
    runtime: &impl RuntimeInspector,
    ctx: &RuntimeContext,
    name: &str,
) -> Result<bool, ResolveError> {
    let output = runtime.inspect(ctx, name, "{{.Name}}").await?;
    Ok(output.status.success())
}

/// First context, in the given order, that holds a container called `name`.
///
/// # Errors
///
/// Returns [`ResolveError::External`] if the runtime cannot be invoked at all.
pub async fn find_container_across_contexts(
    runtime: &impl RuntimeInspector,
    name: &str,
    contexts: &[RuntimeContext],
) -> Result<Option<RuntimeContext>, ResolveError> {
    for ctx in contexts {
        if container_exists(runtime, ctx, name).await? {
            tracing::debug!(container = name, context = %ctx, "container found");
            return Ok(Some(ctx.clone()));
        }
    }
    Ok(None)
}

/// Read the recognised labels of `name` in `ctx`.
///
/// # Errors
///
/// Returns [`ResolveError::Runtime`] if the inspect fails or its output is
/// not a JSON label map.
pub async fn read_container_labels(
    runtime: &impl RuntimeInspector,
    name: &str,
    ctx: &RuntimeContext,
) -> Result<ContainerLabelState, ResolveError> {
    let action = format!("reading labels of {name}");
    let output = runtime
        .inspect(ctx, name, "{{json .Config.Labels}}")
        .await?;
    if !output.status.success() {
        return Err(ResolveError::runtime(&action, &output.stderr));
    }
    let labels = parse_label_json(&String::from_utf8_lossy(&output.stdout)).ok_or_else(|| {
        ResolveError::Runtime {
            action,
            message: "unexpected inspect output".to_string(),
        }
    })?;
    Ok(ContainerLabelState::from_labels(&labels))
}

/// Parse the label map printed by `{{json .Config.Labels}}`. `null` is empty.
#[must_use]
pub fn parse_label_json(text: &str) -> Option<HashMap<String, String>> {
    let value: Option<HashMap<String, String>> = serde_json::from_str(text.trim()).ok()?;
    Some(value.unwrap_or_default())
}

/// Current state of `name` in `ctx`.
///
/// # Errors
///
/// Returns [`ResolveError::External`] if the runtime cannot be invoked at all.
pub async fn container_state(
    runtime: &impl RuntimeInspector,
    ctx: &RuntimeContext,
    name: &str,
) -> Result<ContainerState, ResolveError> {
    let output = runtime.inspect(ctx, name, "{{.State.Status}}").await?;
    if !output.status.success() {
        return Ok(ContainerState::NotFound);
    }
    let status = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if status == "running" {
        Ok(ContainerState::Running)
    } else {
        Ok(ContainerState::Stopped(status))
    }
}

/// Filters matching managed containers, plus any extra `key=value` label.
#[must_use]
pub fn managed_filters(extra: Option<(LabelKey, &str)>) -> Vec<String> {
    let mut filters = vec![format!("label={}", LabelKey::Managed.assign(MANAGED_VALUE))];
    if let Some((key, value)) = extra {
        filters.push(format!("label={}", key.assign(value)));
    }
    filters
}

/// The managed container for `workspace` in `ctx`, if there is one.
///
/// # Errors
///
/// Returns [`ResolveError::AmbiguousWorkspace`] if more than one managed
/// container carries the workspace label, or [`ResolveError::Runtime`] if
/// the listing fails.
pub async fn find_workspace_container(
    runtime: &impl RuntimeInspector,
    workspace: &str,
    ctx: &RuntimeContext,
) -> Result<Option<String>, ResolveError> {
    let filters = managed_filters(Some((LabelKey::Workspace, workspace)));
    let output = runtime.ps(ctx, &filters, "{{.Names}}").await?;
    if !output.status.success() {
        return Err(ResolveError::runtime(
            "listing workspace containers",
            &output.stderr,
        ));
    }
    let mut names = output_lines(&output.stdout);
    match names.len() {
        0 => Ok(None),
        1 => Ok(names.pop()),
        _ => Err(ResolveError::AmbiguousWorkspace {
            workspace: workspace.to_string(),
            matches: names,
        }),
    }
}

/// Names of every container in `ctx`, lower-cased.
///
/// # Errors
///
/// Returns [`ResolveError::Runtime`] if the listing fails.
pub async fn list_container_names(
    runtime: &impl RuntimeInspector,
    ctx: &RuntimeContext,
) -> Result<BTreeSet<String>, ResolveError> {
    let output = runtime.ps(ctx, &[], "{{.Names}}").await?;
    if !output.status.success() {
        return Err(ResolveError::runtime("listing containers", &output.stderr));
    }
    Ok(output_lines(&output.stdout)
        .into_iter()
        .map(|n| n.to_lowercase())
        .collect())
}

/// A name for a new container for `workspace` that no container in `ctx`
/// already uses (case-insensitively).
///
/// # Errors
///
/// Returns [`ResolveError::NameRetriesExhausted`] when every attempt collides.
pub async fn resolve_container_name_for_creation(
    runtime: &impl RuntimeInspector,
    workspace: &str,
    ctx: &RuntimeContext,
) -> Result<String, ResolveError> {
    resolve_container_name_with(runtime, workspace, ctx, collision_suffix).await
}

/// [`resolve_container_name_for_creation`] with an injectable suffix source.
///
/// # Errors
///
/// Returns [`ResolveError::NameRetriesExhausted`] when every attempt collides.
pub async fn resolve_container_name_with(
    runtime: &impl RuntimeInspector,
    workspace: &str,
    ctx: &RuntimeContext,
    mut suffix: impl FnMut() -> String,
) -> Result<String, ResolveError> {
    let base = container_base_name(workspace);
    if !list_container_names(runtime, ctx).await?.contains(&base.to_lowercase()) {
        return Ok(base);
    }
    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let candidate = with_suffix(&base, &suffix());
        let taken = list_container_names(runtime, ctx).await?;
        if !taken.contains(&candidate.to_lowercase()) {
            tracing::debug!(base = %base, candidate = %candidate, attempt, "name collision resolved");
            return Ok(candidate);
        }
    }
    Err(ResolveError::NameRetriesExhausted {
        base,
        attempts: MAX_NAME_ATTEMPTS,
    })
}

fn output_lines(stdout: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
