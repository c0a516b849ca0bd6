use serde::{Deserialize, Serialize};

/// Session mode requested on the command line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SessionMode {
    /// Run the agent command inside the session container.
    #[default]
    Run,
    /// Open an interactive login shell.
    Shell,
    /// Run a one-off command non-interactively.
    Exec,
}

impl SessionMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SessionMode::Run => "run",
            SessionMode::Shell => "shell",
            SessionMode::Exec => "exec",
        }
    }
}

impl std::fmt::Display for SessionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single outcome of target resolution for one invocation.
///
/// Built once by the resolution pipeline and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Container name to attach to or create.
    pub container: String,
    /// Absolute, normalised workspace path.
    pub workspace: String,
    /// Data volume mounted into the container.
    pub data_volume: String,
    /// Runtime context the container lives in (`"default"` for the default endpoint).
    pub context: String,
    /// Whether the caller should remember this target for the rest of the invocation.
    pub should_persist_state: bool,
    /// `true` when the container does not exist yet and will be created.
    pub created_by_this_invocation: bool,
    /// `true` when the data volume name was freshly generated by `shell --reset`.
    pub generated_from_reset: bool,
    /// `true` when an existing container of the same name must be removed
    /// before this one is created (`--fresh`, or `--reset` over a live session).
    #[serde(default)]
    pub replaces_existing: bool,
}

impl ResolvedTarget {
    /// Returns `true` when this target refers to an existing container.
    #[must_use]
    pub fn is_attach(&self) -> bool {
        !self.created_by_this_invocation
    }
}

/// What the provisioner did to make the target usable.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionAction {
    Created,
    Started,
    AlreadyRunning,
}

/// Provisioning result reported to the user and to `--json` consumers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProvisionReport {
    pub action: ProvisionAction,
    /// Host port reserved for the container's SSH daemon, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_port: Option<u16>,
    /// Whether `ssh_port` is actually published by the runtime. A port
    /// allocated while starting an unlabelled container is not: publishing
    /// only happens at creation.
    #[serde(default)]
    pub ssh_port_published: bool,
}
