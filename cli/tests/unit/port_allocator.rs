//! SSH port allocation against labels and host listeners.

#![allow(clippy::expect_used)]

use std::collections::BTreeSet;

use agentpod_cli::application::services::port_alloc::{
    allocate_in_range, allocate_ssh_port, host_listening_ports,
};
use agentpod_cli::domain::context::RuntimeContext;
use agentpod_cli::domain::error::ResolveError;
use agentpod_cli::domain::net::PortRange;

use crate::mocks::{FakeRuntime, ScriptedSockets};

const SS_LISTING: &str = "\
LISTEN 0      128          0.0.0.0:2221      0.0.0.0:*
LISTEN 0      128        127.0.0.1:5432      0.0.0.0:*
";

#[tokio::test]
async fn empty_host_gets_the_first_port() {
    let port = allocate_ssh_port(&FakeRuntime::new(), &ScriptedSockets::default(), &RuntimeContext::default())
        .await
        .expect("allocates");
    assert_eq!(port, 2220);
}

#[tokio::test]
async fn labelled_ports_are_reserved_even_when_stopped() {
    let runtime = FakeRuntime::new();
    runtime.add_managed("default", "a", "/a", "v", 2220, "exited");
    runtime.add_managed("default", "b", "/b", "v", 2222, "running");
    let sockets = ScriptedSockets {
        primary: Some(SS_LISTING.to_string()),
        ..Default::default()
    };

    let port = allocate_ssh_port(&runtime, &sockets, &RuntimeContext::default())
        .await
        .expect("allocates");

    assert_eq!(port, 2223);
}

#[tokio::test]
async fn labels_in_other_contexts_do_not_reserve() {
    let runtime = FakeRuntime::new();
    runtime.add_managed("rootless", "a", "/a", "v", 2220, "running");

    let port = allocate_ssh_port(&runtime, &ScriptedSockets::default(), &RuntimeContext::default())
        .await
        .expect("allocates");

    assert_eq!(port, 2220);
}

#[tokio::test]
async fn fallback_listing_only_used_without_primary() {
    let with_primary = ScriptedSockets {
        primary: Some(SS_LISTING.to_string()),
        fallback: Some("tcp 0 0 0.0.0.0:2225 0.0.0.0:* LISTEN".to_string()),
        ..Default::default()
    };
    let ports = host_listening_ports(&with_primary).await;
    assert_eq!(ports, BTreeSet::from([2221, 5432]));
    assert_eq!(with_primary.fallback_calls.get(), 0);

    let without_primary = ScriptedSockets {
        fallback: Some("tcp 0 0 0.0.0.0:2225 0.0.0.0:* LISTEN".to_string()),
        native: BTreeSet::from([2226]),
        ..Default::default()
    };
    let ports = host_listening_ports(&without_primary).await;
    assert_eq!(ports, BTreeSet::from([2225, 2226]));
}

#[tokio::test]
async fn native_listeners_are_always_merged() {
    let sockets = ScriptedSockets {
        primary: Some(SS_LISTING.to_string()),
        native: BTreeSet::from([2220]),
        ..Default::default()
    };

    let port = allocate_ssh_port(&FakeRuntime::new(), &sockets, &RuntimeContext::default())
        .await
        .expect("allocates");

    assert_eq!(port, 2222);
}

#[tokio::test]
async fn exhausted_range_is_an_error() {
    let runtime = FakeRuntime::new();
    runtime.add_managed("default", "a", "/a", "v", 2300, "running");
    let range = PortRange {
        low: 2300,
        high: 2300,
    };

    let err = allocate_in_range(&runtime, &ScriptedSockets::default(), &RuntimeContext::default(), range)
        .await
        .expect_err("no free port");

    assert!(matches!(err, ResolveError::PortsExhausted { low: 2300, high: 2300 }));
}
