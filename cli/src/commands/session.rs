//! `agentpod run`, `shell` and `exec`: resolve, provision, attach.

use std::io::IsTerminal as _;
use std::process::ExitCode;

use agentpod_common::SessionMode;
use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service;
use crate::application::services::provision::{provision, provision_options};
use crate::application::services::resolve::resolve_target;
use crate::application::services::session::{attach, attach_command};
use crate::commands::SessionArgs;
use crate::domain::session::SessionCommandOptions;
use crate::output::json;

/// Arguments for `agentpod run`.
#[derive(Args, Debug)]
pub struct RunArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Command to run instead of the agent
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

impl RunArgs {
    #[must_use]
    pub fn into_options(self) -> SessionCommandOptions {
        self.session.into_options(SessionMode::Run, self.command)
    }
}

/// Arguments for `agentpod shell`.
#[derive(Args, Debug)]
pub struct ShellArgs {
    #[command(flatten)]
    pub session: SessionArgs,
}

impl ShellArgs {
    #[must_use]
    pub fn into_options(self) -> SessionCommandOptions {
        self.session.into_options(SessionMode::Shell, Vec::new())
    }
}

/// Arguments for `agentpod exec`.
#[derive(Args, Debug)]
pub struct ExecArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Command to run
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

impl ExecArgs {
    #[must_use]
    pub fn into_options(self) -> SessionCommandOptions {
        self.session.into_options(SessionMode::Exec, self.command)
    }
}

/// Run a session command.
///
/// The exit code is the in-container command's own exit code.
///
/// # Errors
///
/// Returns a `ResolveError` (wrapped in `anyhow`) when resolution or
/// provisioning fails, or an error if the user config cannot be loaded.
pub async fn run(app: &AppContext, opts: SessionCommandOptions) -> Result<ExitCode> {
    let ports = app.session_ports();
    let target = resolve_target(&ports, &opts).await?;

    if target.replaces_existing {
        let prompt = format!(
            "Recreate container {} (data volume {} is kept)?",
            target.container, target.data_volume
        );
        if !app.confirm(&prompt, true)? {
            app.output.info("Cancelled.");
            return Ok(ExitCode::SUCCESS);
        }
    }

    let config = config_service::load_config(&app.config_store)?;
    let options = provision_options(&opts, &config);
    let report = {
        let reporter = app.reporter();
        provision(&ports, &target, &options, &reporter).await?
    };

    if app.is_json() {
        let doc = serde_json::json!({ "target": target, "provision": report });
        println!("{}", json::to_pretty(&doc)?);
    } else {
        app.renderer()
            .render_session(&target, &report, app.snapshot.direct_spawn);
    }

    let mut command = attach_command(&opts);
    command.interactive = command.interactive && std::io::stdin().is_terminal();
    let code = attach(&app.runtime, &target, &command).await?;
    tracing::debug!(code, "session command exited");
    Ok(ExitCode::from(u8::try_from(code).unwrap_or(1)))
}
