//! Host socket-table probe: implements `SocketProbe`.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::application::ports::{CommandRunner, SocketProbe};
use crate::domain::net::parse_proc_net_tcp;

/// Socket utilities are local and fast; anything slower is treated as absent.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[cfg(target_os = "linux")]
const FALLBACK_ARGS: &[&str] = &["-tln"];
#[cfg(not(target_os = "linux"))]
const FALLBACK_ARGS: &[&str] = &["-an", "-p", "tcp"];

/// Kernel tables listing TCP sockets on Linux.
const PROC_NET_TABLES: &[&str] = &["/proc/net/tcp", "/proc/net/tcp6"];

/// Reads listening ports via `ss`, `netstat`, and procfs.
pub struct HostSocketProbe<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> HostSocketProbe<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn listing(&self, program: &str, args: &[&str]) -> Option<String> {
        match self.runner.run_with_timeout(program, args, PROBE_TIMEOUT).await {
            Ok(output) if output.status.success() => {
                Some(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                tracing::debug!(program, code = ?output.status.code(), "socket listing failed");
                None
            }
            Err(e) => {
                tracing::debug!(program, error = %e, "socket listing unavailable");
                None
            }
        }
    }
}

impl<R: CommandRunner> SocketProbe for HostSocketProbe<R> {
    async fn primary_listing(&self) -> Option<String> {
        self.listing("ss", &["-Htln"]).await
    }

    async fn fallback_listing(&self) -> Option<String> {
        self.listing("netstat", FALLBACK_ARGS).await
    }

    async fn native_listeners(&self) -> BTreeSet<u16> {
        let read = tokio::task::spawn_blocking(|| {
            PROC_NET_TABLES
                .iter()
                .filter_map(|path| std::fs::read_to_string(path).ok())
                .flat_map(|text| parse_proc_net_tcp(&text))
                .collect::<BTreeSet<u16>>()
        })
        .await;
        read.unwrap_or_else(|e| {
            tracing::debug!(error = %e, "procfs listener scan failed");
            BTreeSet::new()
        })
    }
}
