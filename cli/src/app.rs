//! Application context: unified state passed to every command handler.
//!
//! Holds the production adapters behind each port plus the per-invocation
//! config snapshot and cancellation token.

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::application::services::SessionPorts;
use crate::domain::snapshot::{ConfigSnapshot, flag_enabled};
use crate::infra::clock::SystemClock;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::YamlConfigStore;
use crate::infra::docker::DockerCli;
use crate::infra::env::{EnvOverrides, load_snapshot};
use crate::infra::fs::LocalFs;
use crate::infra::git::GitCli;
use crate::infra::sockets::HostSocketProbe;
use crate::output::human::HumanRenderer;
use crate::output::reporter::TerminalReporter;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `AGENTPOD_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    pub mode: OutputMode,
    pub runtime: DockerCli<TokioCommandRunner>,
    pub sockets: HostSocketProbe<TokioCommandRunner>,
    pub git: GitCli<TokioCommandRunner>,
    pub config_store: YamlConfigStore,
    pub fs: LocalFs,
    pub clock: SystemClock,
    /// Environment and host facts, read once at startup.
    pub snapshot: ConfigSnapshot,
    /// Fired on Ctrl-C.
    pub cancel: CancellationToken,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `AGENTPOD_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn new(flags: &AppFlags, env: EnvOverrides, cancel: CancellationToken) -> Result<Self> {
        let ci_env = std::env::var("CI").is_ok()
            || flag_enabled(std::env::var("AGENTPOD_YES").ok().as_deref());
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config_override = env.config.clone();
        let snapshot = load_snapshot(env)?;
        let config_store = YamlConfigStore::new(config_override, snapshot.home.as_deref());

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            runtime: DockerCli::new(TokioCommandRunner::default()),
            sockets: HostSocketProbe::new(TokioCommandRunner::default()),
            git: GitCli::new(TokioCommandRunner::default()),
            config_store,
            fs: LocalFs,
            clock: SystemClock,
            snapshot,
            cancel,
            non_interactive,
        })
    }

    /// Borrow the ports bundle the session services work against.
    #[must_use]
    pub fn session_ports(
        &self,
    ) -> SessionPorts<
        '_,
        DockerCli<TokioCommandRunner>,
        HostSocketProbe<TokioCommandRunner>,
        GitCli<TokioCommandRunner>,
    > {
        SessionPorts {
            runtime: &self.runtime,
            sockets: &self.sockets,
            git: &self.git,
            config: &self.config_store,
            fs: &self.fs,
            clock: &self.clock,
            snapshot: &self.snapshot,
            cancel: &self.cancel,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Progress reporter for long-running steps.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, or `AGENTPOD_YES` env),
    /// returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
