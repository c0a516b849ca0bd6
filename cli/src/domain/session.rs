//! Session command options and their structural validation.
//!
//! Validation here runs before any external call is made.

use std::path::PathBuf;
use std::sync::LazyLock;

use agentpod_common::SessionMode;
use regex::Regex;

use crate::domain::error::ResolveError;

/// Container names the runtime accepts.
pub static CONTAINER_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_.-]{0,127}$").expect("valid regex")
});

/// Memory limits: a byte count with an optional unit suffix.
pub static MEMORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[0-9]+[bkmgBKMG]?$").expect("valid regex")
});

/// Everything a session command passes to the resolution pipeline.
#[derive(Debug, Clone, Default)]
pub struct SessionCommandOptions {
    /// Workspace path as typed; defaults to the current directory.
    pub workspace: Option<String>,
    /// Explicit container name.
    pub container: Option<String>,
    /// Explicit data-volume name.
    pub volume: Option<String>,
    /// Explicit config file, bypassing discovery.
    pub config: Option<PathBuf>,
    pub mode: SessionMode,
    /// Recreate the session container, keeping its data volume.
    pub fresh: bool,
    /// `shell` only: generate a brand-new data volume.
    pub reset: bool,
    /// Skip alternate contexts and use the default one.
    pub force: bool,
    pub memory: Option<String>,
    pub cpus: Option<String>,
    pub image: Option<String>,
    pub template: Option<String>,
    pub channel: Option<String>,
    /// Trailing command arguments.
    pub command: Vec<String>,
}

impl SessionCommandOptions {
    /// Whether `--reset` changes resolution for these options.
    #[must_use]
    pub fn reset_applies(&self) -> bool {
        self.reset && self.mode == SessionMode::Shell && self.container.is_none()
    }

    /// Reject structurally invalid input.
    ///
    /// # Errors
    ///
    /// Returns `ResolveError::InvalidInput` describing the first problem found.
    pub fn validate(&self) -> Result<(), ResolveError> {
        if let Some(ws) = &self.workspace {
            if ws.trim().is_empty() {
                return Err(invalid("workspace path is empty"));
            }
            if ws.contains('\0') {
                return Err(invalid("workspace path contains a NUL byte"));
            }
        }
        if let Some(name) = &self.container {
            validate_container_name(name)?;
            if self.reset {
                return Err(invalid(
                    "--reset cannot be combined with --container; reset derives a new volume for a workspace session",
                ));
            }
        }
        if self.mode == SessionMode::Exec && self.command.is_empty() {
            return Err(invalid("exec requires a command: agentpod exec -- <cmd> [args...]"));
        }
        if let Some(memory) = &self.memory {
            validate_memory(memory)?;
        }
        if let Some(cpus) = &self.cpus {
            validate_cpus(cpus)?;
        }
        Ok(())
    }
}

/// # Errors
///
/// Returns `ResolveError::InvalidInput` if the name is not runtime-legal.
pub fn validate_container_name(name: &str) -> Result<(), ResolveError> {
    if CONTAINER_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(invalid(&format!(
            "invalid container name '{name}': must match [A-Za-z0-9][A-Za-z0-9_.-]* (max 128 chars)"
        )))
    }
}

/// # Errors
///
/// Returns `ResolveError::InvalidInput` for anything but `<digits>[b|k|m|g]`.
pub fn validate_memory(value: &str) -> Result<(), ResolveError> {
    if MEMORY_RE.is_match(value) {
        Ok(())
    } else {
        Err(invalid(&format!(
            "invalid memory limit '{value}': expected e.g. 512m or 4g"
        )))
    }
}

/// # Errors
///
/// Returns `ResolveError::InvalidInput` unless the value is a positive number.
pub fn validate_cpus(value: &str) -> Result<(), ResolveError> {
    match value.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => Ok(()),
        _ => Err(invalid(&format!(
            "invalid cpu limit '{value}': expected a positive number such as 2 or 1.5"
        ))),
    }
}

fn invalid(msg: &str) -> ResolveError {
    ResolveError::InvalidInput(msg.to_string())
}
