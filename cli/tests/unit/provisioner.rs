//! Provisioning: create, start, leave alone, replace.

#![allow(clippy::expect_used)]

use std::time::Duration;

use agentpod_cli::application::services::provision::{
    ProvisionOptions, RunningPoll, provision, wait_until_running,
};
use agentpod_cli::application::services::resolve::resolve_target;
use agentpod_cli::domain::context::RuntimeContext;
use agentpod_cli::domain::error::ResolveError;
use agentpod_cli::domain::session::SessionCommandOptions;
use agentpod_common::{ProvisionAction, ResolvedTarget, SessionMode};

use crate::mocks::{RecordingReporter, World, WORKSPACE, managed_labels};

fn options() -> ProvisionOptions {
    ProvisionOptions {
        image: "ghcr.io/agentpod/base:stable".to_string(),
        memory: None,
        cpus: None,
        poll: RunningPoll {
            interval: Duration::from_millis(1),
            budget: Duration::from_millis(200),
        },
    }
}

fn shell() -> SessionCommandOptions {
    SessionCommandOptions {
        mode: SessionMode::Shell,
        ..Default::default()
    }
}

async fn resolved(world: &World, opts: &SessionCommandOptions) -> ResolvedTarget {
    resolve_target(&world.ports(), opts).await.expect("resolves")
}

#[tokio::test]
async fn creates_labelled_container_and_waits_for_running() {
    let world = World::new();
    world.runtime.pending_polls.set(2);
    let target = resolved(&world, &shell()).await;
    let reporter = RecordingReporter::default();

    let report = provision(&world.ports(), &target, &options(), &reporter)
        .await
        .expect("provisions");

    assert_eq!(report.action, ProvisionAction::Created);
    assert_eq!(report.ssh_port, Some(2220));
    assert_eq!(world.runtime.calls(), vec!["run default app".to_string()]);

    let created = world.runtime.find("default", "app").expect("created");
    assert_eq!(created.labels.get("agentpod.managed").map(String::as_str), Some("true"));
    assert_eq!(created.labels.get("agentpod.workspace").map(String::as_str), Some(WORKSPACE));
    assert_eq!(created.labels.get("agentpod.data-volume").map(String::as_str), Some("agentpod-data"));
    assert_eq!(created.labels.get("agentpod.ssh-port").map(String::as_str), Some("2220"));

    let (_, mounts, publish) = world.runtime.created.borrow()[0].clone();
    assert_eq!(mounts, vec!["agentpod-data:/data".to_string(), format!("{WORKSPACE}:/workspace")]);
    assert_eq!(publish.as_deref(), Some("127.0.0.1:2220:22"));
    assert_eq!(world.runtime.pending_polls.get(), 0);
    assert!(reporter.events.borrow().iter().any(|e| e == "ok: app is running"));
}

#[tokio::test]
async fn second_session_after_create_attaches() {
    let world = World::new();
    let first = resolved(&world, &shell()).await;
    provision(&world.ports(), &first, &options(), &RecordingReporter::default())
        .await
        .expect("creates");

    let second = resolved(&world, &shell()).await;
    assert!(!second.created_by_this_invocation);
    assert_eq!(second.container, first.container);

    let report = provision(&world.ports(), &second, &options(), &RecordingReporter::default())
        .await
        .expect("attaches");
    assert_eq!(report.action, ProvisionAction::AlreadyRunning);
    assert_eq!(report.ssh_port, Some(2220));
    assert_eq!(world.runtime.mutating_calls(), 1);
}

#[tokio::test]
async fn stopped_container_is_started_on_its_label_port() {
    let world = World::new();
    world
        .runtime
        .add_managed("default", "app", WORKSPACE, "agentpod-data", 2234, "exited");
    let target = resolved(&world, &shell()).await;

    let report = provision(&world.ports(), &target, &options(), &RecordingReporter::default())
        .await
        .expect("starts");

    assert_eq!(report.action, ProvisionAction::Started);
    assert_eq!(report.ssh_port, Some(2234));
    assert!(report.ssh_port_published);
    assert_eq!(world.runtime.calls(), vec!["start default app".to_string()]);
}

#[tokio::test]
async fn stopped_container_without_port_label_gets_an_unpublished_port() {
    let world = World::new();
    world.runtime.add(
        "default",
        "app",
        managed_labels(WORKSPACE, "agentpod-data", None),
        "exited",
    );
    let target = resolved(&world, &shell()).await;
    assert!(!target.created_by_this_invocation);

    let report = provision(&world.ports(), &target, &options(), &RecordingReporter::default())
        .await
        .expect("starts");

    assert_eq!(report.action, ProvisionAction::Started);
    assert_eq!(report.ssh_port, Some(2220));
    assert!(!report.ssh_port_published);
    assert_eq!(world.runtime.calls(), vec!["start default app".to_string()]);
}

#[tokio::test]
async fn fresh_removes_then_recreates_on_the_same_volume() {
    let world = World::new();
    world
        .runtime
        .add_managed("default", "app", WORKSPACE, "kept-vol", 2220, "running");
    let opts = SessionCommandOptions {
        fresh: true,
        ..shell()
    };
    let target = resolved(&world, &opts).await;

    let report = provision(&world.ports(), &target, &options(), &RecordingReporter::default())
        .await
        .expect("recreates");

    assert_eq!(report.action, ProvisionAction::Created);
    assert_eq!(
        world.runtime.calls(),
        vec!["rm-f default app".to_string(), "run default app".to_string()]
    );
    let created = world.runtime.find("default", "app").expect("recreated");
    assert_eq!(created.labels.get("agentpod.data-volume").map(String::as_str), Some("kept-vol"));
    // The old container's port label is gone with it, so the lowest port is free again.
    assert_eq!(report.ssh_port, Some(2220));
}

#[tokio::test]
async fn runtime_rejection_surfaces_its_stderr() {
    let world = World::new();
    *world.runtime.run_failure.borrow_mut() = Some("pull access denied".to_string());
    let target = resolved(&world, &shell()).await;

    let err = provision(&world.ports(), &target, &options(), &RecordingReporter::default())
        .await
        .expect_err("rejected");

    match err {
        ResolveError::Runtime { message, .. } => assert_eq!(message, "pull access denied"),
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn container_that_never_runs_times_out() {
    let world = World::new();
    *world.runtime.status_after_run.borrow_mut() = Some("created".to_string());
    let target = resolved(&world, &shell()).await;

    let err = provision(&world.ports(), &target, &options(), &RecordingReporter::default())
        .await
        .expect_err("never running");

    assert!(matches!(err, ResolveError::NotRunning { ref name, .. } if name == "app"), "{err:?}");
}

#[tokio::test]
async fn cancellation_interrupts_the_running_poll() {
    let world = World::new();
    world
        .runtime
        .add_managed("default", "app", WORKSPACE, "v", 2220, "created");
    let poll = RunningPoll {
        interval: Duration::from_secs(60),
        budget: Duration::from_secs(600),
    };
    let ctx = RuntimeContext::default();
    let cancel = world.cancel.clone();
    let canceller = async {
        tokio::task::yield_now().await;
        cancel.cancel();
    };

    let (result, ()) = tokio::join!(
        wait_until_running(&world.runtime, &ctx, "app", poll, &world.cancel),
        canceller
    );

    assert!(matches!(result, Err(ResolveError::Cancelled)));
}
