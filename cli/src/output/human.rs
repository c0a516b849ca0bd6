//! Human-readable terminal renderer.

use agentpod_common::{ProvisionAction, ProvisionReport, ResolvedTarget};
use owo_colors::OwoColorize as _;

use crate::domain::config::AgentpodConfig;
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version.
    pub fn render_version(&self, version: &str) {
        self.ctx.info(&format!("agentpod v{version}"));
    }

    /// Render a resolved target as a key/value block.
    pub fn render_target(&self, target: &ResolvedTarget) {
        self.ctx.kv("Container:", &target.container);
        self.ctx.kv("Workspace:", &target.workspace);
        self.ctx.kv("Volume:   ", &target.data_volume);
        self.ctx.kv("Context:  ", &target.context);
        self.ctx.kv("Action:   ", target_action(target));
    }

    /// Render the outcome of provisioning before attaching.
    pub fn render_session(&self, target: &ResolvedTarget, report: &ProvisionReport, direct_spawn: bool) {
        let verb = match report.action {
            ProvisionAction::Created => "created",
            ProvisionAction::Started => "started",
            ProvisionAction::AlreadyRunning => "running",
        };
        self.ctx.success(&format!(
            "{} {verb} (volume {}, context {})",
            target.container.style(self.ctx.styles.name),
            target.data_volume,
            target.context
        ));
        if target.generated_from_reset {
            self.ctx.info(&format!("fresh data volume {}", target.data_volume));
        }
        if direct_spawn {
            return;
        }
        match report.ssh_port {
            Some(port) if report.ssh_port_published => {
                self.ctx.kv("SSH:", &format!("ssh -p {port} agent@127.0.0.1"));
            }
            Some(port) => self.ctx.info(&format!(
                "ssh port {port} is not published; recreate with --fresh to reach it over ssh"
            )),
            None => {}
        }
    }

    /// Render the user config document.
    pub fn render_config(&self, config: &AgentpodConfig, path: &str) {
        self.ctx.section("Defaults:");
        let defaults = &config.defaults;
        for (key, value) in [
            ("data_volume:", defaults.data_volume.as_deref()),
            ("image:", defaults.image.as_deref()),
            ("memory:", defaults.memory.as_deref()),
            ("cpus:", defaults.cpus.as_deref()),
        ] {
            self.ctx.kv(key, value.unwrap_or("(unset)"));
        }
        if !config.workspaces.is_empty() {
            self.ctx.section("Workspaces:");
            for (workspace, entry) in &config.workspaces {
                self.ctx.kv(
                    &format!("{workspace}:"),
                    entry.data_volume.as_deref().unwrap_or("(unset)"),
                );
            }
        }
        self.ctx.kv("File:", path);
    }
}

fn target_action(target: &ResolvedTarget) -> &'static str {
    match (target.created_by_this_invocation, target.replaces_existing) {
        (true, true) => "recreate",
        (true, false) => "create",
        (false, _) => "attach",
    }
}
