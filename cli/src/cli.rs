//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;
use crate::infra::env::EnvOverrides;

/// Per-workspace containers for AI coding agents
#[derive(Parser)]
#[command(
    name = "agentpod",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output (a non-empty NO_COLOR does the same)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log engine decisions to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start or attach to the workspace session and run the agent
    Run(commands::session::RunArgs),

    /// Open a login shell in the workspace session
    Shell(commands::session::ShellArgs),

    /// Run a command in the workspace session
    Exec(commands::session::ExecArgs),

    /// Show which container a session would use, without changing anything
    Resolve(commands::resolve::ResolveArgs),

    /// Stop the session container (data is kept)
    Stop(commands::TargetArgs),

    /// Remove the session container (the data volume is kept)
    Rm(commands::TargetArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the environment cannot be read or the command fails.
    pub async fn run(self, cancel: CancellationToken) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            yes,
            command,
        } = self;
        let flags = AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        };
        let app = AppContext::new(&flags, EnvOverrides::from_env()?, cancel)?;

        match command {
            Command::Run(args) => commands::session::run(&app, args.into_options()).await,
            Command::Shell(args) => commands::session::run(&app, args.into_options()).await,
            Command::Exec(args) => commands::session::run(&app, args.into_options()).await,
            Command::Resolve(args) => commands::resolve::run(&app, args).await,
            Command::Stop(args) => commands::stop::run(&app, &args).await,
            Command::Rm(args) => commands::rm::run(&app, &args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
