//! Application service: runtime context directory.
//!
//! Knows which runtime contexts to try and which of them exist on this host.

use crate::application::ports::RuntimeInspector;
use crate::domain::context::{RuntimeContext, candidate_contexts};
use crate::domain::snapshot::ConfigSnapshot;

/// Contexts to probe, in priority order: alternates first, `default` last.
#[must_use]
pub fn list_candidate_contexts() -> Vec<RuntimeContext> {
    candidate_contexts()
}

/// Whether `ctx` is usable. The default context always is; any probe
/// failure means the alternate does not exist.
pub async fn context_exists(runtime: &impl RuntimeInspector, ctx: &RuntimeContext) -> bool {
    if ctx.is_default() {
        return true;
    }
    match runtime.context_inspect(ctx.name()).await {
        Ok(output) => output.status.success(),
        Err(e) => {
            tracing::debug!(context = %ctx, error = %e, "context probe failed");
            false
        }
    }
}

/// Candidate contexts that exist, in priority order. Never empty.
pub async fn find_available_contexts(runtime: &impl RuntimeInspector) -> Vec<RuntimeContext> {
    let mut available = Vec::new();
    for ctx in list_candidate_contexts() {
        if context_exists(runtime, &ctx).await {
            available.push(ctx);
        }
    }
    available
}

/// Contexts a lookup may search. Forcing the default skips every alternate.
pub async fn searchable_contexts(
    runtime: &impl RuntimeInspector,
    snapshot: &ConfigSnapshot,
    force: bool,
) -> Vec<RuntimeContext> {
    if force || snapshot.force_default_context {
        return vec![RuntimeContext::default()];
    }
    find_available_contexts(runtime).await
}
