//! agentpod CLI - per-workspace containers for AI coding agents

use std::process::ExitCode;

use agentpod_cli::cli::Cli;
use agentpod_cli::domain::error::{ConfigError, ResolveError};
use agentpod_cli::output::{OutputContext, json};
use agentpod_common::exit_codes;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json_mode = cli.json;
    let no_color = cli.no_color;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::debug!("interrupt received");
            on_signal.cancel();
        }
    });

    match cli.run(cancel).await {
        Ok(code) => code,
        Err(err) => report(&err, json_mode, no_color),
    }
}

/// `AGENTPOD_LOG`, else `RUST_LOG`, else `warn` (`debug` with `--verbose`).
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("AGENTPOD_LOG")
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(err: &anyhow::Error, json_mode: bool, no_color: bool) -> ExitCode {
    let (status, code) = if let Some(resolve) = err.downcast_ref::<ResolveError>() {
        (resolve.exit_code(), resolve.code())
    } else if err.downcast_ref::<ConfigError>().is_some() {
        (exit_codes::FAILURE, "invalid_config")
    } else {
        (exit_codes::FAILURE, "error")
    };

    let message = format!("{err:#}");
    if json_mode {
        match json::format_error(&message, code) {
            Ok(doc) => println!("{doc}"),
            Err(_) => eprintln!("Error: {message}"),
        }
    } else {
        OutputContext::new(no_color, false).error(&message);
    }
    ExitCode::from(u8::try_from(status).unwrap_or(1))
}
