//! Runtime contexts: named endpoints of the container runtime.

use std::fmt;

/// Literal name of the runtime's default endpoint.
pub const DEFAULT_CONTEXT: &str = "default";

/// Alternate contexts, highest priority first. The default context is
/// implicitly appended after these.
pub const ALTERNATE_CONTEXTS: &[&str] = &["agentpod-sandbox", "rootless"];

/// A runtime context name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeContext(String);

impl RuntimeContext {
    /// A context by name. `"default"` (any case) maps to the default endpoint.
    #[must_use]
    pub fn named(name: &str) -> Self {
        if name.eq_ignore_ascii_case(DEFAULT_CONTEXT) {
            Self::default()
        } else {
            Self(name.to_string())
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_CONTEXT
    }

    /// Global runtime arguments selecting this context.
    ///
    /// Empty for the default endpoint so the runtime's own configuration applies.
    #[must_use]
    pub fn runtime_args(&self) -> Vec<&str> {
        if self.is_default() {
            Vec::new()
        } else {
            vec!["--context", self.0.as_str()]
        }
    }
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self(DEFAULT_CONTEXT.to_string())
    }
}

impl fmt::Display for RuntimeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The fixed candidate list: alternates in priority order, then default.
#[must_use]
pub fn candidate_contexts() -> Vec<RuntimeContext> {
    ALTERNATE_CONTEXTS
        .iter()
        .map(|name| RuntimeContext::named(name))
        .chain(std::iter::once(RuntimeContext::default()))
        .collect()
}
