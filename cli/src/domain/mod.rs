//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod context;
pub mod error;
pub mod labels;
pub mod net;
pub mod sanitize;
pub mod session;
pub mod snapshot;
pub mod volume;
pub mod workspace;

pub use config::{AgentpodConfig, ConfigKey, validate_config_value};
pub use context::RuntimeContext;
pub use error::{ConfigError, ResolveError};
pub use labels::ContainerLabelState;
pub use session::SessionCommandOptions;
pub use snapshot::ConfigSnapshot;
