//! Command implementations

pub mod config;
pub mod resolve;
pub mod rm;
pub mod session;
pub mod stop;
pub mod version;

use std::path::PathBuf;

use agentpod_common::SessionMode;
use clap::Args;

use crate::domain::session::SessionCommandOptions;

/// Options shared by every command that resolves a session.
#[derive(Args, Debug, Default)]
pub struct SessionArgs {
    /// Workspace directory (default: current directory)
    #[arg(short, long, value_name = "PATH")]
    pub workspace: Option<String>,

    /// Use this container name instead of the workspace-derived one
    #[arg(short, long, value_name = "NAME")]
    pub container: Option<String>,

    /// Data volume to mount at /data
    #[arg(long, value_name = "VOLUME")]
    pub volume: Option<String>,

    /// Project config file (skips .agentpod.yaml discovery)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Recreate the container, keeping its data volume
    #[arg(long)]
    pub fresh: bool,

    /// Start the shell on a brand-new data volume
    #[arg(long)]
    pub reset: bool,

    /// Use the default runtime context only
    #[arg(long)]
    pub force: bool,

    /// Memory limit for a new container (e.g. 4g)
    #[arg(long)]
    pub memory: Option<String>,

    /// CPU limit for a new container (e.g. 2 or 1.5)
    #[arg(long)]
    pub cpus: Option<String>,

    /// Image for a new container (overrides template and channel)
    #[arg(long)]
    pub image: Option<String>,

    /// Image template for a new container
    #[arg(long)]
    pub template: Option<String>,

    /// Image channel for a new container
    #[arg(long)]
    pub channel: Option<String>,
}

impl SessionArgs {
    /// Options for one invocation in `mode`.
    #[must_use]
    pub fn into_options(self, mode: SessionMode, command: Vec<String>) -> SessionCommandOptions {
        SessionCommandOptions {
            workspace: self.workspace,
            container: self.container,
            volume: self.volume,
            config: self.config,
            mode,
            fresh: self.fresh,
            reset: self.reset,
            force: self.force,
            memory: self.memory,
            cpus: self.cpus,
            image: self.image,
            template: self.template,
            channel: self.channel,
            command,
        }
    }
}

/// Selects an existing session for `stop` and `rm`.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// Workspace directory (default: current directory)
    #[arg(short, long, value_name = "PATH")]
    pub workspace: Option<String>,

    /// Container name
    #[arg(short, long, value_name = "NAME")]
    pub container: Option<String>,

    /// Use the default runtime context only
    #[arg(long)]
    pub force: bool,
}

impl TargetArgs {
    /// Options resolving the target the way `shell` would.
    #[must_use]
    pub fn to_options(&self) -> SessionCommandOptions {
        SessionCommandOptions {
            workspace: self.workspace.clone(),
            container: self.container.clone(),
            mode: SessionMode::Shell,
            force: self.force,
            ..SessionCommandOptions::default()
        }
    }
}
