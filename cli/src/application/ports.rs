//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::config::AgentpodConfig;
use crate::domain::context::RuntimeContext;

// ── Value Types ───────────────────────────────────────────────────────────────

/// Everything the runtime needs to create and start a new container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSpec<'a> {
    pub name: &'a str,
    pub hostname: String,
    pub image: &'a str,
    /// `key=value` label assignments.
    pub labels: Vec<String>,
    /// `source:target` bind or volume mounts.
    pub mounts: Vec<String>,
    /// `KEY=value` environment entries.
    pub env: Vec<String>,
    /// `host_ip:host_port:container_port` publication.
    pub publish: Option<String>,
    pub memory: Option<&'a str>,
    pub cpus: Option<&'a str>,
}

// ── Container Runtime Port Traits ─────────────────────────────────────────────

/// Read-only queries against the container runtime.
#[allow(async_fn_in_trait)]
pub trait RuntimeInspector {
    /// Inspect a named runtime context. Success means the context exists.
    async fn context_inspect(&self, name: &str) -> Result<Output>;
    /// Inspect a container in `ctx`, rendering `format` (a Go template).
    async fn inspect(&self, ctx: &RuntimeContext, container: &str, format: &str)
    -> Result<Output>;
    /// List all containers in `ctx` (running or not) matching every filter.
    async fn ps(&self, ctx: &RuntimeContext, filters: &[String], format: &str) -> Result<Output>;
}

/// Container lifecycle operations.
#[allow(async_fn_in_trait)]
pub trait RuntimeLifecycle {
    /// Create and start a detached container.
    async fn run(&self, ctx: &RuntimeContext, spec: &ContainerSpec<'_>) -> Result<Output>;
    /// Start an existing, stopped container.
    async fn start(&self, ctx: &RuntimeContext, container: &str) -> Result<Output>;
    /// Stop a running container.
    async fn stop(&self, ctx: &RuntimeContext, container: &str) -> Result<Output>;
    /// Remove a container; `force` also removes it while running.
    async fn remove(&self, ctx: &RuntimeContext, container: &str, force: bool) -> Result<Output>;
}

/// Command execution inside a container.
#[allow(async_fn_in_trait)]
pub trait RuntimeShell {
    /// Run `args` inside the container with inherited stdio.
    async fn exec_status(
        &self,
        ctx: &RuntimeContext,
        container: &str,
        args: &[&str],
        interactive: bool,
    ) -> Result<ExitStatus>;
}

/// Composite trait: any type implementing all three sub-traits is a `ContainerRuntime`.
pub trait ContainerRuntime: RuntimeInspector + RuntimeLifecycle + RuntimeShell {}

/// Blanket implementation: any type implementing all three sub-traits is a `ContainerRuntime`.
impl<T> ContainerRuntime for T where T: RuntimeInspector + RuntimeLifecycle + RuntimeShell {}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with inherited stdio and return only its exit status.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Host Probes ───────────────────────────────────────────────────────────────

/// Sources of host ports currently bound by some process.
///
/// Each source degrades to "nothing known" instead of failing.
#[allow(async_fn_in_trait)]
pub trait SocketProbe {
    /// Output of the primary socket-listing utility, `None` when unavailable.
    async fn primary_listing(&self) -> Option<String>;
    /// Output of the fallback socket-listing utility, `None` when unavailable.
    async fn fallback_listing(&self) -> Option<String>;
    /// Listening ports enumerated without external utilities.
    async fn native_listeners(&self) -> BTreeSet<u16>;
}

/// Version-control queries against a workspace.
#[allow(async_fn_in_trait)]
pub trait GitProbe {
    /// Current branch of the repository at `workspace`.
    ///
    /// `None` when not a repository, detached, the tool is missing, or the
    /// query exceeds its time bound.
    async fn current_branch(&self, workspace: &Path) -> Option<String>;
}

// ── Configuration and Filesystem Ports ────────────────────────────────────────

/// Persistence for the user-level config file, plus read access to project files.
pub trait ConfigStore {
    /// Load the user config, or the default when no file exists.
    fn load(&self) -> Result<AgentpodConfig>;
    /// Persist the user config.
    fn save(&self, config: &AgentpodConfig) -> Result<()>;
    /// Location of the user config file.
    fn path(&self) -> Result<PathBuf>;
    /// Load a config file at an arbitrary path (project or explicit file).
    fn load_file(&self, path: &Path) -> Result<AgentpodConfig>;
}

/// Minimal filesystem queries used during workspace and config discovery.
pub trait WorkspaceFs {
    /// Resolve symlinks; `None` when the path does not exist.
    fn canonicalize(&self, path: &Path) -> Option<PathBuf>;
    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;
}

/// Source of the current time.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}
