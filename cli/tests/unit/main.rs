//! Unit tests for the agentpod CLI
//!
//! These tests use in-memory fakes and run fast without external I/O.

mod architecture;
mod docker_cli;
mod helpers;
mod port_allocator;
mod provisioner;
mod session_service;
