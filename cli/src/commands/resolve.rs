//! `agentpod resolve`: print the target a session would use.

use std::process::ExitCode;

use agentpod_common::SessionMode;
use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::resolve::resolve_target;
use crate::commands::SessionArgs;
use crate::output::json;

/// Arguments for `agentpod resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub session: SessionArgs,

    /// Session mode to resolve for
    #[arg(long, value_enum, default_value_t = SessionMode::Shell)]
    pub mode: SessionMode,

    /// Command an `exec` session would run
    #[arg(last = true, value_name = "CMD")]
    pub command: Vec<String>,
}

/// Resolve without provisioning. Nothing is created, started or removed.
///
/// # Errors
///
/// Returns a `ResolveError` (wrapped in `anyhow`) when resolution fails.
pub async fn run(app: &AppContext, args: ResolveArgs) -> Result<ExitCode> {
    let opts = args.session.into_options(args.mode, args.command);
    let target = resolve_target(&app.session_ports(), &opts).await?;
    if app.is_json() {
        println!("{}", json::to_pretty(&target)?);
    } else {
        app.renderer().render_target(&target);
    }
    Ok(ExitCode::SUCCESS)
}
