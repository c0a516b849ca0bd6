//! Domain types and validators for agentpod configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::session::{validate_cpus, validate_memory};
use crate::domain::volume::is_valid_volume_name;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &["data_volume", "image", "memory", "cpus"];

// ── Config schema ────────────────────────────────────────────────────────────

/// One config document: the user config (`~/.agentpod/config.yaml`) or a
/// project `.agentpod.yaml`. Both share the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AgentpodConfig {
    /// Global entries.
    pub defaults: Defaults,
    /// Workspace-scoped entries keyed by absolute workspace path.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub workspaces: BTreeMap<String, WorkspaceEntry>,
}

/// Global entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Defaults {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpus: Option<String>,
}

/// Workspace-scoped entries.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct WorkspaceEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_volume: Option<String>,
}

/// A recognised configuration key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    DataVolume,
    Image,
    Memory,
    Cpus,
}

impl ConfigKey {
    /// Parse a key name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownKey` listing the valid keys.
    pub fn parse(key: &str) -> Result<Self> {
        match key {
            "data_volume" => Ok(Self::DataVolume),
            "image" => Ok(Self::Image),
            "memory" => Ok(Self::Memory),
            "cpus" => Ok(Self::Cpus),
            _ => Err(ConfigError::UnknownKey {
                key: key.to_string(),
                valid: VALID_CONFIG_KEYS.join(", "),
            }
            .into()),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DataVolume => "data_volume",
            Self::Image => "image",
            Self::Memory => "memory",
            Self::Cpus => "cpus",
        }
    }

    /// Only the data volume may be set per workspace.
    #[must_use]
    pub fn workspace_scoped(self) -> bool {
        matches!(self, Self::DataVolume)
    }
}

impl AgentpodConfig {
    /// Workspace-scoped data volume for `workspace`, if set.
    #[must_use]
    pub fn workspace_volume(&self, workspace: &str) -> Option<&str> {
        self.workspaces
            .get(workspace)
            .and_then(|e| e.data_volume.as_deref())
    }

    /// Global default data volume, if set.
    #[must_use]
    pub fn default_volume(&self) -> Option<&str> {
        self.defaults.data_volume.as_deref()
    }

    /// Read a key, globally or for one workspace.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotWorkspaceScoped` for a workspace read of a global-only key.
    pub fn get(&self, key: ConfigKey, workspace: Option<&str>) -> Result<Option<&str>> {
        if let Some(ws) = workspace {
            ensure_scoped(key)?;
            return Ok(self.workspace_volume(ws));
        }
        Ok(self.global_slot(key))
    }

    /// Set a key after validating its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is invalid or the key cannot be workspace-scoped.
    pub fn set(&mut self, key: ConfigKey, value: &str, workspace: Option<&str>) -> Result<()> {
        validate_config_value(key, value)?;
        if let Some(ws) = workspace {
            ensure_scoped(key)?;
            self.workspaces.entry(ws.to_string()).or_default().data_volume =
                Some(value.to_string());
            return Ok(());
        }
        *self.global_slot_mut(key) = Some(value.to_string());
        Ok(())
    }

    /// Remove a key. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotWorkspaceScoped` for a workspace unset of a global-only key.
    pub fn unset(&mut self, key: ConfigKey, workspace: Option<&str>) -> Result<bool> {
        if let Some(ws) = workspace {
            ensure_scoped(key)?;
            let removed = self
                .workspaces
                .get_mut(ws)
                .and_then(|e| e.data_volume.take())
                .is_some();
            if self.workspaces.get(ws).is_some_and(|e| *e == WorkspaceEntry::default()) {
                self.workspaces.remove(ws);
            }
            return Ok(removed);
        }
        Ok(self.global_slot_mut(key).take().is_some())
    }

    fn global_slot(&self, key: ConfigKey) -> Option<&str> {
        match key {
            ConfigKey::DataVolume => self.defaults.data_volume.as_deref(),
            ConfigKey::Image => self.defaults.image.as_deref(),
            ConfigKey::Memory => self.defaults.memory.as_deref(),
            ConfigKey::Cpus => self.defaults.cpus.as_deref(),
        }
    }

    fn global_slot_mut(&mut self, key: ConfigKey) -> &mut Option<String> {
        match key {
            ConfigKey::DataVolume => &mut self.defaults.data_volume,
            ConfigKey::Image => &mut self.defaults.image,
            ConfigKey::Memory => &mut self.defaults.memory,
            ConfigKey::Cpus => &mut self.defaults.cpus,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: ConfigKey, value: &str) -> Result<()> {
    let hint = match key {
        ConfigKey::DataVolume if !is_valid_volume_name(value) => {
            "Volume names start with a letter or digit and contain only letters, digits, '_', '.' or '-'."
        }
        ConfigKey::Image if value.trim().is_empty() || value.contains(char::is_whitespace) => {
            "Image references cannot be empty or contain whitespace."
        }
        ConfigKey::Memory if validate_memory(value).is_err() => "Expected e.g. 512m or 4g.",
        ConfigKey::Cpus if validate_cpus(value).is_err() => "Expected a positive number such as 2 or 1.5.",
        _ => return Ok(()),
    };
    Err(ConfigError::InvalidValue {
        key: key.as_str().to_string(),
        value: value.to_string(),
        hint: hint.to_string(),
    }
    .into())
}

fn ensure_scoped(key: ConfigKey) -> Result<()> {
    if key.workspace_scoped() {
        Ok(())
    } else {
        Err(ConfigError::NotWorkspaceScoped(key.as_str().to_string()).into())
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
