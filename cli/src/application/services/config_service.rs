//! Application service: configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::{AgentpodConfig, ConfigKey};

/// Load the user configuration.
pub fn load_config(store: &impl ConfigStore) -> Result<AgentpodConfig> {
    store.load()
}

/// Read one key, globally or for `workspace`.
pub fn get_value(
    store: &impl ConfigStore,
    key: &str,
    workspace: Option<&str>,
) -> Result<Option<String>> {
    let key = ConfigKey::parse(key)?;
    let config = store.load()?;
    Ok(config.get(key, workspace)?.map(str::to_string))
}

/// Validate and store one key.
pub fn set_value(
    store: &impl ConfigStore,
    key: &str,
    value: &str,
    workspace: Option<&str>,
) -> Result<()> {
    let key = ConfigKey::parse(key)?;
    let mut config = store.load()?;
    config.set(key, value.trim(), workspace)?;
    store.save(&config)
}

/// Remove one key. Returns whether anything was removed; the file is only
/// rewritten when it was.
pub fn unset_value(store: &impl ConfigStore, key: &str, workspace: Option<&str>) -> Result<bool> {
    let key = ConfigKey::parse(key)?;
    let mut config = store.load()?;
    let removed = config.unset(key, workspace)?;
    if removed {
        store.save(&config)?;
    }
    Ok(removed)
}
