//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use agentpod_common::SessionMode;
use agentpod_common::exit_codes;
use thiserror::Error;

/// Fallback message when the runtime fails without writing to stderr.
pub const RUNTIME_FALLBACK_MESSAGE: &str = "container runtime exited with a non-zero status";

// ── Resolution and provisioning errors ───────────────────────────────────────

/// Every failure the resolution pipeline and provisioner can report.
///
/// Each variant maps to one process exit code via [`ResolveError::exit_code`].
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(
        "Container '{name}' exists but is not managed by agentpod.\n\nPick another name or remove it: docker rm {name}"
    )]
    UnmanagedContainer { name: String, mode: SessionMode },

    #[error("Container '{name}' is missing required label(s): {missing}. Refusing to use it.")]
    MissingLabels { name: String, missing: String },

    #[error("Multiple containers are labelled for workspace {workspace}: {}. Pass --container to choose one.", matches.join(", "))]
    AmbiguousWorkspace {
        workspace: String,
        matches: Vec<String>,
    },

    #[error("No session container found for {0}.")]
    NoSession(String),

    #[error("No free SSH port in range {low}-{high}. Stop unused sessions or free a port in that range.")]
    PortsExhausted { low: u16, high: u16 },

    #[error("Could not find a free container name for '{base}' after {attempts} attempts.")]
    NameRetriesExhausted { base: String, attempts: u32 },

    #[error("{action} failed: {message}")]
    Runtime { action: String, message: String },

    #[error("Container '{name}' did not reach the running state within {secs}s.")]
    NotRunning { name: String, secs: u64 },

    #[error("Interrupted.")]
    Cancelled,

    #[error("{0}")]
    External(String),
}

impl ResolveError {
    /// Build a `Runtime` error from a failed runtime invocation's stderr.
    #[must_use]
    pub fn runtime(action: &str, stderr: &[u8]) -> Self {
        let text = String::from_utf8_lossy(stderr);
        let trimmed = text.trim();
        Self::Runtime {
            action: action.to_string(),
            message: if trimmed.is_empty() {
                RUNTIME_FALLBACK_MESSAGE.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }

    /// Process exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnmanagedContainer { mode, .. } if *mode != SessionMode::Run => {
                exit_codes::UNMANAGED_CONTAINER
            }
            Self::Cancelled => exit_codes::CANCELLED,
            _ => exit_codes::FAILURE,
        }
    }

    /// Short machine-readable code used in `--json` error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::UnmanagedContainer { .. } => "unmanaged_container",
            Self::MissingLabels { .. } => "missing_labels",
            Self::AmbiguousWorkspace { .. } => "ambiguous_workspace",
            Self::NoSession(_) => "no_session",
            Self::PortsExhausted { .. } => "ports_exhausted",
            Self::NameRetriesExhausted { .. } => "name_retries_exhausted",
            Self::Runtime { .. } => "runtime_failed",
            Self::NotRunning { .. } => "not_running",
            Self::Cancelled => "cancelled",
            Self::External(_) => "external",
        }
    }
}

impl From<anyhow::Error> for ResolveError {
    fn from(err: anyhow::Error) -> Self {
        Self::External(format!("{err:#}"))
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\n{hint}")]
    InvalidValue {
        key: String,
        value: String,
        hint: String,
    },

    #[error("Setting {0} cannot be scoped to a workspace")]
    NotWorkspaceScoped(String),
}
