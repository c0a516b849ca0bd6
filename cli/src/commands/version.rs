//! Version command

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;

/// Run the version command.
///
/// # Errors
///
/// Never fails in practice; the signature matches the other commands.
pub fn run(app: &AppContext) -> Result<ExitCode> {
    let version = env!("CARGO_PKG_VERSION");
    if app.is_json() {
        println!(r#"{{"version":"{version}"}}"#);
    } else {
        app.renderer().render_version(version);
    }
    Ok(ExitCode::SUCCESS)
}
