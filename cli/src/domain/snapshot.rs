//! Immutable snapshot of the ambient inputs resolution depends on.
//!
//! Built once per invocation by the infra layer and passed explicitly to
//! every resolver, so resolution never reads the process environment.

use std::path::PathBuf;

/// Environment and host facts captured at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    /// The user's home directory, if it could be determined.
    pub home: Option<PathBuf>,
    /// Current working directory; the default workspace.
    pub cwd: PathBuf,
    /// Data-volume override from the environment.
    pub data_volume_override: Option<String>,
    /// Skip alternate contexts and always use the default one.
    pub force_default_context: bool,
    /// Attach through the runtime's `exec` instead of advertising SSH.
    pub direct_spawn: bool,
    /// Host timezone passed into new containers.
    pub timezone: Option<String>,
}

/// Interpret an environment flag value: `1`, `true`, `yes`, `on` (any case) are set.
#[must_use]
pub fn flag_enabled(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}
