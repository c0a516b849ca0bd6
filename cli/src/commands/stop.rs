//! `agentpod stop`: stop the session container.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::lookup::{ContainerState, container_state};
use crate::application::services::resolve::target_context;
use crate::application::services::session::{resolve_existing, stop_container};
use crate::commands::TargetArgs;
use crate::output::json;

/// Stop the container. Its data volume and labels are untouched.
///
/// # Errors
///
/// Returns an error if there is no session or the runtime refuses.
pub async fn run(app: &AppContext, args: &TargetArgs) -> Result<ExitCode> {
    let ports = app.session_ports();
    let target = resolve_existing(&ports, &args.to_options()).await?;

    let state = container_state(&app.runtime, &target_context(&target), &target.container).await?;
    if state != ContainerState::Running {
        if app.is_json() {
            print_json(&target.container, false)?;
        } else {
            app.output
                .info(&format!("{} is not running", target.container));
        }
        return Ok(ExitCode::SUCCESS);
    }

    stop_container(&app.runtime, &target).await?;
    if app.is_json() {
        print_json(&target.container, true)?;
    } else {
        app.output.success(&format!("Stopped {}", target.container));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_json(container: &str, stopped: bool) -> Result<()> {
    let doc = serde_json::json!({ "container": container, "stopped": stopped });
    println!("{}", json::to_pretty(&doc)?);
    Ok(())
}
