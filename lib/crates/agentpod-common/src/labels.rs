//! Container label keys: the ownership contract with the container runtime.
//!
//! A container without [`LabelKey::Managed`] set to [`MANAGED_VALUE`] is
//! foreign and is never attached to or removed.

use std::fmt;

/// Value written to the managed label.
pub const MANAGED_VALUE: &str = "true";

/// One of the four recognised label keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LabelKey {
    Managed,
    Workspace,
    DataVolume,
    SshPort,
}

impl LabelKey {
    /// Every recognised key, in the order they are written on creation.
    pub const ALL: [LabelKey; 4] = [
        LabelKey::Managed,
        LabelKey::Workspace,
        LabelKey::DataVolume,
        LabelKey::SshPort,
    ];

    /// The literal label key as stored by the runtime.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LabelKey::Managed => "agentpod.managed",
            LabelKey::Workspace => "agentpod.workspace",
            LabelKey::DataVolume => "agentpod.data-volume",
            LabelKey::SshPort => "agentpod.ssh-port",
        }
    }

    /// Render `key=value`, the form used by `--label` and `--filter label=`.
    #[must_use]
    pub fn assign(self, value: &str) -> String {
        format!("{}={value}", self.as_str())
    }
}

impl fmt::Display for LabelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
