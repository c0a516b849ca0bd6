//! Typed view over a container's label map.

use std::collections::HashMap;

use agentpod_common::labels::{LabelKey, MANAGED_VALUE};

/// The four recognised labels of a container.
///
/// Keys missing from the runtime's label map read as empty / `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContainerLabelState {
    pub managed: bool,
    pub workspace: String,
    pub data_volume: String,
    pub ssh_port: String,
}

impl ContainerLabelState {
    /// Build the typed record from a raw label map.
    #[must_use]
    pub fn from_labels(labels: &HashMap<String, String>) -> Self {
        let get = |key: LabelKey| labels.get(key.as_str()).cloned().unwrap_or_default();
        Self {
            managed: labels
                .get(LabelKey::Managed.as_str())
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(MANAGED_VALUE)),
            workspace: get(LabelKey::Workspace),
            data_volume: get(LabelKey::DataVolume),
            ssh_port: get(LabelKey::SshPort),
        }
    }

    /// Labels a managed container is required to carry but does not.
    ///
    /// Empty for unmanaged containers: their labels are not ours to judge.
    #[must_use]
    pub fn missing_required(&self) -> Vec<LabelKey> {
        if !self.managed {
            return Vec::new();
        }
        let mut missing = Vec::new();
        if self.workspace.trim().is_empty() {
            missing.push(LabelKey::Workspace);
        }
        if self.data_volume.trim().is_empty() {
            missing.push(LabelKey::DataVolume);
        }
        missing
    }

    /// The SSH port label parsed as a TCP port, if present and well-formed.
    #[must_use]
    pub fn ssh_port(&self) -> Option<u16> {
        parse_port(&self.ssh_port)
    }
}

/// Parse a decimal port label value. Zero and garbage read as absent.
#[must_use]
pub fn parse_port(raw: &str) -> Option<u16> {
    raw.trim().parse::<u16>().ok().filter(|p| *p != 0)
}
