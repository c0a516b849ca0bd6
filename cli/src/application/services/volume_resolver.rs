//! Application service: data-volume and runtime-context resolution.
//!
//! The volume waterfall is an ordered list of sources tried in sequence;
//! the first that yields a valid volume name wins.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{ConfigStore, RuntimeInspector, WorkspaceFs};
use crate::application::services::contexts::searchable_contexts;
use crate::domain::config::AgentpodConfig;
use crate::domain::context::RuntimeContext;
use crate::domain::error::ResolveError;
use crate::domain::snapshot::ConfigSnapshot;
use crate::domain::volume::{DEFAULT_DATA_VOLUME, accept_volume_name};
use crate::domain::workspace::{PROJECT_CONFIG_FILE, VCS_MARKER, workspace_key};

/// Inputs to one data-volume resolution.
#[derive(Debug, Clone, Copy)]
pub struct VolumeRequest<'a> {
    /// Normalised absolute workspace path.
    pub workspace: &'a Path,
    /// `--volume`, if given.
    pub explicit_volume: Option<&'a str>,
    /// `--config`, if given; replaces project config discovery.
    pub explicit_config: Option<&'a Path>,
}

/// Where a resolved volume name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolumeSource {
    Explicit,
    Environment,
    UserWorkspace,
    ProjectWorkspace,
    ProjectDefault,
    UserDefault,
    BuiltIn,
}

impl VolumeSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Environment => "environment",
            Self::UserWorkspace => "user-workspace",
            Self::ProjectWorkspace => "project-workspace",
            Self::ProjectDefault => "project-default",
            Self::UserDefault => "user-default",
            Self::BuiltIn => "built-in",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVolume {
    pub name: String,
    pub source: VolumeSource,
}

type Strategy = fn(&mut Sources<'_>) -> Result<Option<String>>;

/// Volume sources in priority order. The built-in default follows them all.
const WATERFALL: [(VolumeSource, Strategy); 6] = [
    (VolumeSource::Explicit, from_explicit),
    (VolumeSource::Environment, from_environment),
    (VolumeSource::UserWorkspace, from_user_workspace),
    (VolumeSource::ProjectWorkspace, from_project_workspace),
    (VolumeSource::ProjectDefault, from_project_default),
    (VolumeSource::UserDefault, from_user_default),
];

/// Lazily loaded config documents shared by the strategies.
struct Sources<'a> {
    request: VolumeRequest<'a>,
    key: String,
    snapshot: &'a ConfigSnapshot,
    store: &'a dyn ConfigStore,
    fs: &'a dyn WorkspaceFs,
    user: Option<AgentpodConfig>,
    project: Option<Option<AgentpodConfig>>,
}

impl Sources<'_> {
    fn user(&mut self) -> Result<&AgentpodConfig> {
        let config = match self.user.take() {
            Some(config) => config,
            None => self.store.load().context("loading user config")?,
        };
        Ok(self.user.insert(config))
    }

    fn project(&mut self) -> Result<Option<&AgentpodConfig>> {
        let config = match self.project.take() {
            Some(config) => config,
            None => self.load_project()?,
        };
        Ok(self.project.insert(config).as_ref())
    }

    fn load_project(&self) -> Result<Option<AgentpodConfig>> {
        let path = match self.request.explicit_config {
            Some(path) => Some(path.to_path_buf()),
            None => find_nearest_config(self.fs, self.request.workspace),
        };
        let Some(path) = path else {
            return Ok(None);
        };
        tracing::debug!(path = %path.display(), "using project config");
        self.store
            .load_file(&path)
            .with_context(|| format!("loading {}", path.display()))
            .map(Some)
    }
}

fn from_explicit(s: &mut Sources<'_>) -> Result<Option<String>> {
    Ok(s.request.explicit_volume.map(str::to_string))
}

fn from_environment(s: &mut Sources<'_>) -> Result<Option<String>> {
    Ok(s.snapshot.data_volume_override.clone())
}

fn from_user_workspace(s: &mut Sources<'_>) -> Result<Option<String>> {
    let key = s.key.clone();
    Ok(s.user()?.workspace_volume(&key).map(str::to_string))
}

fn from_project_workspace(s: &mut Sources<'_>) -> Result<Option<String>> {
    let key = s.key.clone();
    Ok(s
        .project()?
        .and_then(|c| c.workspace_volume(&key))
        .map(str::to_string))
}

fn from_project_default(s: &mut Sources<'_>) -> Result<Option<String>> {
    Ok(s.project()?
        .and_then(AgentpodConfig::default_volume)
        .map(str::to_string))
}

fn from_user_default(s: &mut Sources<'_>) -> Result<Option<String>> {
    Ok(s.user()?.default_volume().map(str::to_string))
}

/// Resolve the data volume for a workspace.
///
/// Invalid names from any source are skipped with a warning; only a config
/// file that cannot be read or parsed is an error.
///
/// # Errors
///
/// Returns [`ResolveError::External`] if a config file exists but cannot be
/// loaded.
pub fn resolve_data_volume(
    store: &dyn ConfigStore,
    fs: &dyn WorkspaceFs,
    snapshot: &ConfigSnapshot,
    request: VolumeRequest<'_>,
) -> Result<ResolvedVolume, ResolveError> {
    let mut sources = Sources {
        request,
        key: workspace_key(request.workspace),
        snapshot,
        store,
        fs,
        user: None,
        project: None,
    };
    for (source, strategy) in WATERFALL {
        let Some(raw) = strategy(&mut sources)? else {
            continue;
        };
        match accept_volume_name(&raw) {
            Some(name) => {
                tracing::debug!(volume = %name, source = source.as_str(), "resolved data volume");
                return Ok(ResolvedVolume { name, source });
            }
            None => {
                tracing::warn!(volume = %raw, source = source.as_str(), "ignoring invalid volume name");
            }
        }
    }
    Ok(ResolvedVolume {
        name: DEFAULT_DATA_VOLUME.to_string(),
        source: VolumeSource::BuiltIn,
    })
}

/// Nearest `.agentpod.yaml` at or above `workspace`.
///
/// The walk stops after the directory holding a `.git` entry, so a project
/// never picks up config from outside its repository.
#[must_use]
pub fn find_nearest_config(fs: &dyn WorkspaceFs, workspace: &Path) -> Option<PathBuf> {
    let mut dir = Some(workspace);
    while let Some(current) = dir {
        let candidate = current.join(PROJECT_CONFIG_FILE);
        if fs.exists(&candidate) {
            return Some(candidate);
        }
        if fs.exists(&current.join(VCS_MARKER)) {
            return None;
        }
        dir = current.parent();
    }
    None
}

/// Runtime context a workspace's container should live in.
///
/// With `force` (or the force-default flag in the snapshot) this is always
/// the default context; otherwise the first available alternate, else
/// default. Context choice never depends on per-workspace config.
pub async fn resolve_context_for_workspace(
    runtime: &impl RuntimeInspector,
    snapshot: &ConfigSnapshot,
    force: bool,
) -> RuntimeContext {
    let ctx = searchable_contexts(runtime, snapshot, force)
        .await
        .into_iter()
        .next()
        .unwrap_or_default();
    tracing::debug!(context = %ctx, "selected runtime context");
    ctx
}
