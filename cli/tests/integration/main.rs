//! Integration tests for the agentpod CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior. None
//! of them need a container runtime: they stop at argument parsing, input
//! validation, or the config file.

mod cli_tests;
