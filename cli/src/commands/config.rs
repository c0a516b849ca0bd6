//! `agentpod config`: show, read and change user configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::application::services::resolve::normalize_workspace;
use crate::domain::workspace::workspace_key;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Print one configuration value
    Get {
        /// Configuration key
        key: String,
        /// Read the value scoped to this workspace
        #[arg(short, long, value_name = "PATH")]
        workspace: Option<String>,
    },
    /// Set configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
        /// Scope the value to this workspace
        #[arg(short, long, value_name = "PATH")]
        workspace: Option<String>,
    },
    /// Remove configuration value
    Unset {
        /// Configuration key
        key: String,
        /// Remove the value scoped to this workspace
        #[arg(short, long, value_name = "PATH")]
        workspace: Option<String>,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error for unknown keys, invalid values, or an unreadable or
/// unwritable config file.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<ExitCode> {
    match cmd {
        ConfigCommand::Show => show_config(app),
        ConfigCommand::Get { key, workspace } => get_config(app, &key, workspace.as_deref()),
        ConfigCommand::Set {
            key,
            value,
            workspace,
        } => set_config(app, &key, &value, workspace.as_deref()),
        ConfigCommand::Unset { key, workspace } => unset_config(app, &key, workspace.as_deref()),
    }
}

/// Config files key workspaces by their normalised absolute path.
fn scope(app: &AppContext, workspace: Option<&str>) -> Option<String> {
    workspace.map(|raw| workspace_key(&normalize_workspace(&app.fs, &app.snapshot, Some(raw))))
}

fn show_config(app: &AppContext) -> Result<ExitCode> {
    let config = config_service::load_config(&app.config_store)?;
    let path = app.config_store.path()?;
    if app.is_json() {
        println!("{}", json::to_pretty(&config)?);
    } else {
        app.renderer()
            .render_config(&config, &path.display().to_string());
    }
    Ok(ExitCode::SUCCESS)
}

fn get_config(app: &AppContext, key: &str, workspace: Option<&str>) -> Result<ExitCode> {
    let scoped = scope(app, workspace);
    let value = config_service::get_value(&app.config_store, key, scoped.as_deref())?;
    if app.is_json() {
        let doc = serde_json::json!({ "key": key, "value": value });
        println!("{}", json::to_pretty(&doc)?);
    } else if let Some(value) = &value {
        println!("{value}");
    }
    Ok(if value.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn set_config(
    app: &AppContext,
    key: &str,
    value: &str,
    workspace: Option<&str>,
) -> Result<ExitCode> {
    let scoped = scope(app, workspace);
    config_service::set_value(&app.config_store, key, value, scoped.as_deref())?;
    if app.is_json() {
        let doc = serde_json::json!({ "key": key, "value": value.trim(), "workspace": scoped });
        println!("{}", json::to_pretty(&doc)?);
    } else {
        app.output.success(&format!("Set {key} = {}", value.trim()));
    }
    Ok(ExitCode::SUCCESS)
}

fn unset_config(app: &AppContext, key: &str, workspace: Option<&str>) -> Result<ExitCode> {
    let scoped = scope(app, workspace);
    let removed = config_service::unset_value(&app.config_store, key, scoped.as_deref())?;
    if app.is_json() {
        let doc = serde_json::json!({ "key": key, "removed": removed });
        println!("{}", json::to_pretty(&doc)?);
    } else if removed {
        app.output.success(&format!("Unset {key}"));
    } else {
        app.output.info(&format!("{key} was not set"));
    }
    Ok(ExitCode::SUCCESS)
}
