//! Application service: SSH port allocation.

use std::collections::BTreeSet;

use agentpod_common::labels::LabelKey;

use crate::application::ports::{RuntimeInspector, SocketProbe};
use crate::application::services::lookup::managed_filters;
use crate::domain::context::RuntimeContext;
use crate::domain::error::ResolveError;
use crate::domain::labels::parse_port;
use crate::domain::net::{PortRange, SSH_PORT_RANGE, parse_socket_listing};

/// Pick the first free port of the SSH range for a new container in `ctx`.
///
/// # Errors
///
/// Returns [`ResolveError::PortsExhausted`] when every port is reserved, or
/// [`ResolveError::Runtime`] if managed containers cannot be listed.
pub async fn allocate_ssh_port(
    runtime: &impl RuntimeInspector,
    sockets: &impl SocketProbe,
    ctx: &RuntimeContext,
) -> Result<u16, ResolveError> {
    allocate_in_range(runtime, sockets, ctx, SSH_PORT_RANGE).await
}

/// Pick the first port of `range` not reserved by a managed container's
/// label and not bound on the host.
///
/// # Errors
///
/// See [`allocate_ssh_port`].
pub async fn allocate_in_range(
    runtime: &impl RuntimeInspector,
    sockets: &impl SocketProbe,
    ctx: &RuntimeContext,
    range: PortRange,
) -> Result<u16, ResolveError> {
    let mut reserved = labelled_ports(runtime, ctx).await?;
    reserved.extend(host_listening_ports(sockets).await);
    let port = range
        .first_free(&reserved)
        .ok_or(ResolveError::PortsExhausted {
            low: range.low,
            high: range.high,
        })?;
    tracing::debug!(port, reserved = reserved.len(), "allocated ssh port");
    Ok(port)
}

/// SSH ports claimed by managed containers in `ctx`, running or not.
///
/// # Errors
///
/// Returns [`ResolveError::Runtime`] if the listing fails.
pub async fn labelled_ports(
    runtime: &impl RuntimeInspector,
    ctx: &RuntimeContext,
) -> Result<BTreeSet<u16>, ResolveError> {
    let format = format!("{{{{.Label \"{}\"}}}}", LabelKey::SshPort.as_str());
    let output = runtime.ps(ctx, &managed_filters(None), &format).await?;
    if !output.status.success() {
        return Err(ResolveError::runtime(
            "listing managed containers",
            &output.stderr,
        ));
    }
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .filter_map(parse_port)
        .collect())
}

/// Union of host listeners reported by the socket utilities and the native
/// enumeration. The fallback utility is consulted only when the primary one
/// is unavailable.
pub async fn host_listening_ports(sockets: &impl SocketProbe) -> BTreeSet<u16> {
    let listing = match sockets.primary_listing().await {
        Some(text) => Some(text),
        None => sockets.fallback_listing().await,
    };
    let mut ports = listing
        .map(|text| parse_socket_listing(&text))
        .unwrap_or_default();
    ports.extend(sockets.native_listeners().await);
    ports
}
