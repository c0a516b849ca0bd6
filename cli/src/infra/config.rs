//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::AgentpodConfig;

/// Directory under the home directory holding the user config.
pub const CONFIG_DIR: &str = ".agentpod";
pub const CONFIG_FILE: &str = "config.yaml";

/// Production implementation of `ConfigStore` that uses YAML files on disk.
pub struct YamlConfigStore {
    path: Option<PathBuf>,
}

impl YamlConfigStore {
    /// Store at `override_path` if given, else `~/.agentpod/config.yaml`.
    #[must_use]
    pub fn new(override_path: Option<PathBuf>, home: Option<&Path>) -> Self {
        let path = override_path.or_else(|| home.map(|h| h.join(CONFIG_DIR).join(CONFIG_FILE)));
        Self { path }
    }

    /// Store backed by exactly `path`.
    #[must_use]
    pub fn at(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<AgentpodConfig> {
        let path = self.path()?;
        if !path.exists() {
            return Ok(AgentpodConfig::default());
        }
        self.load_file(&path)
    }

    fn save(&self, config: &AgentpodConfig) -> Result<()> {
        let path = self.path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("cannot create {}", parent.display()))?;
        }
        let content = serde_yaml::to_string(config).context("cannot serialize config")?;

        // Write beside the target and rename so readers never see a partial file.
        let tmp = path.with_extension("yaml.tmp");
        std::fs::write(&tmp, content).with_context(|| format!("cannot write {}", tmp.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("cannot set permissions on {}", tmp.display()))?;
        }
        std::fs::rename(&tmp, &path)
            .with_context(|| format!("cannot replace {}", path.display()))?;
        tracing::debug!(path = %path.display(), "saved config");
        Ok(())
    }

    fn path(&self) -> Result<PathBuf> {
        self.path
            .clone()
            .ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
    }

    fn load_file(&self, path: &Path) -> Result<AgentpodConfig> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        if content.trim().is_empty() {
            return Ok(AgentpodConfig::default());
        }
        serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
    }
}
