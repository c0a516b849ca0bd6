//! Process exit codes shared by the CLI and wrapper scripts.

/// Command completed.
pub const SUCCESS: i32 = 0;

/// Generic resolution or provisioning failure.
pub const FAILURE: i32 = 1;

/// An explicitly named container exists but was not created by agentpod.
///
/// Only used outside `run` mode; `run` reports the same condition as [`FAILURE`].
pub const UNMANAGED_CONTAINER: i32 = 15;

/// The invocation was interrupted (Ctrl-C).
pub const CANCELLED: i32 = 130;
