//! `agentpod rm`: remove the session container, keeping its data.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::session::{remove_container, resolve_existing};
use crate::commands::TargetArgs;
use crate::output::json;

/// Remove the container. The data volume survives for the next session.
///
/// # Errors
///
/// Returns an error if there is no session, the prompt fails, or the
/// runtime refuses.
pub async fn run(app: &AppContext, args: &TargetArgs) -> Result<ExitCode> {
    let ports = app.session_ports();
    let target = resolve_existing(&ports, &args.to_options()).await?;

    let prompt = format!(
        "Remove container {}? Data volume {} is kept.",
        target.container, target.data_volume
    );
    if !app.confirm(&prompt, true)? {
        app.output.info("Cancelled.");
        return Ok(ExitCode::SUCCESS);
    }

    remove_container(&app.runtime, &target).await?;
    if app.is_json() {
        let doc = serde_json::json!({
            "container": target.container,
            "removed": true,
            "data_volume": target.data_volume,
        });
        println!("{}", json::to_pretty(&doc)?);
    } else {
        app.output.success(&format!("Removed {}", target.container));
        app.output
            .kv("Volume kept:", &target.data_volume);
    }
    Ok(ExitCode::SUCCESS)
}
