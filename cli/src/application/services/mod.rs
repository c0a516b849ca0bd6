//! Application services: use-case orchestration.
//!
//! Each service module implements a single use-case by composing domain logic
//! with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

use tokio_util::sync::CancellationToken;

use crate::application::ports::{
    Clock, ConfigStore, ContainerRuntime, GitProbe, SocketProbe, WorkspaceFs,
};
use crate::domain::error::ResolveError;
use crate::domain::snapshot::ConfigSnapshot;

pub mod config_service;
pub mod contexts;
pub mod lookup;
pub mod port_alloc;
pub mod provision;
pub mod resolve;
pub mod session;
pub mod volume_resolver;

/// The ports and ambient inputs one session invocation works against.
///
/// Borrowed from `AppContext` in production and from fakes in tests.
pub struct SessionPorts<'a, R, S, G>
where
    R: ContainerRuntime,
    S: SocketProbe,
    G: GitProbe,
{
    pub runtime: &'a R,
    pub sockets: &'a S,
    pub git: &'a G,
    pub config: &'a dyn ConfigStore,
    pub fs: &'a dyn WorkspaceFs,
    pub clock: &'a dyn Clock,
    pub snapshot: &'a ConfigSnapshot,
    pub cancel: &'a CancellationToken,
}

/// Bail out with [`ResolveError::Cancelled`] once the token has fired.
///
/// # Errors
///
/// Returns [`ResolveError::Cancelled`] if cancellation was requested.
pub fn checkpoint(cancel: &CancellationToken) -> Result<(), ResolveError> {
    if cancel.is_cancelled() {
        return Err(ResolveError::Cancelled);
    }
    Ok(())
}
