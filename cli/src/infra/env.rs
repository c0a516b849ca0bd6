//! Environment loading: builds the `ConfigSnapshot` once per invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::snapshot::{ConfigSnapshot, flag_enabled};

/// Prefix shared by every environment variable the tool reads.
pub const ENV_PREFIX: &str = "AGENTPOD_";

/// `AGENTPOD_*` variables, loaded via `envy`.
///
/// Each field maps to `AGENTPOD_<FIELD>`:
///   - `AGENTPOD_DATA_VOLUME`           data-volume override
///   - `AGENTPOD_FORCE_DEFAULT_CONTEXT` `1`/`true` to skip alternate contexts
///   - `AGENTPOD_DIRECT_SPAWN`          `1`/`true` to attach via runtime exec only
///   - `AGENTPOD_CONFIG`                user config file location
#[derive(Debug, Default, Deserialize)]
pub struct EnvOverrides {
    pub data_volume: Option<String>,
    pub force_default_context: Option<String>,
    pub direct_spawn: Option<String>,
    pub config: Option<PathBuf>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value `envy` cannot decode.
    pub fn from_env() -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_env()
            .with_context(|| format!("failed to load {ENV_PREFIX}* environment variables"))
    }

    /// Read overrides from explicit `(name, value)` pairs.
    ///
    /// # Errors
    ///
    /// Returns an error if a value cannot be decoded.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Result<Self> {
        envy::prefixed(ENV_PREFIX)
            .from_iter(pairs)
            .context("failed to decode environment overrides")
    }

    /// Fold the overrides with host facts into a snapshot.
    #[must_use]
    pub fn into_snapshot(
        self,
        cwd: PathBuf,
        home: Option<PathBuf>,
        timezone: Option<String>,
    ) -> ConfigSnapshot {
        ConfigSnapshot {
            home,
            cwd,
            data_volume_override: self.data_volume.filter(|v| !v.trim().is_empty()),
            force_default_context: flag_enabled(self.force_default_context.as_deref()),
            direct_spawn: flag_enabled(self.direct_spawn.as_deref()),
            timezone,
        }
    }
}

/// Snapshot of the real process environment.
///
/// # Errors
///
/// Returns an error if the current directory is unavailable or an
/// override cannot be decoded.
pub fn load_snapshot(env: EnvOverrides) -> Result<ConfigSnapshot> {
    let cwd = std::env::current_dir().context("cannot determine current directory")?;
    Ok(env.into_snapshot(cwd, dirs::home_dir(), host_timezone()))
}

/// Host timezone: `TZ`, else `/etc/timezone`, else the `/etc/localtime` link target.
#[must_use]
pub fn host_timezone() -> Option<String> {
    if let Some(tz) = std::env::var("TZ").ok().filter(|v| !v.trim().is_empty()) {
        return Some(tz.trim().to_string());
    }
    if let Some(tz) = std::fs::read_to_string("/etc/timezone")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
    {
        return Some(tz);
    }
    let target = std::fs::read_link("/etc/localtime").ok()?;
    zone_from_localtime(&target.to_string_lossy())
}

/// `/usr/share/zoneinfo/Europe/Berlin` → `Europe/Berlin`.
fn zone_from_localtime(target: &str) -> Option<String> {
    target
        .split_once("zoneinfo/")
        .map(|(_, zone)| zone.to_string())
        .filter(|z| !z.is_empty())
}
