//! Attach and lifecycle helpers around a resolved target.

#![allow(clippy::expect_used)]

use agentpod_cli::application::services::resolve::resolve_target;
use agentpod_cli::application::services::session::{
    attach, attach_command, remove_container, resolve_existing, stop_container,
};
use agentpod_cli::domain::session::SessionCommandOptions;
use agentpod_common::SessionMode;

use crate::mocks::{World, WORKSPACE};

fn shell() -> SessionCommandOptions {
    SessionCommandOptions {
        mode: SessionMode::Shell,
        ..Default::default()
    }
}

#[tokio::test]
async fn attach_returns_the_child_exit_code() {
    let world = World::new();
    world
        .runtime
        .add_managed("default", "app", WORKSPACE, "v", 2220, "running");
    world.runtime.exec_code.set(3);
    let opts = SessionCommandOptions {
        mode: SessionMode::Exec,
        command: vec!["make".to_string(), "test".to_string()],
        ..Default::default()
    };
    let target = resolve_target(&world.ports(), &opts).await.expect("resolves");

    let code = attach(&world.runtime, &target, &attach_command(&opts))
        .await
        .expect("attaches");

    assert_eq!(code, 3);
    let execs = world.runtime.execs.borrow();
    assert_eq!(execs[0].0, "default app");
    assert_eq!(execs[0].1, vec!["make".to_string(), "test".to_string()]);
    assert!(!execs[0].2);
}

#[tokio::test]
async fn stop_and_remove_act_on_the_existing_container_only() {
    let world = World::new();
    world
        .runtime
        .add_managed("default", "app", WORKSPACE, "keep-me", 2220, "running");

    let target = resolve_existing(&world.ports(), &shell())
        .await
        .expect("exists");
    stop_container(&world.runtime, &target).await.expect("stops");
    assert_eq!(
        world.runtime.find("default", "app").map(|c| c.status),
        Some("exited".to_string())
    );

    remove_container(&world.runtime, &target).await.expect("removes");
    assert!(world.runtime.find("default", "app").is_none());
    assert_eq!(
        world.runtime.calls(),
        vec!["stop default app".to_string(), "rm-f default app".to_string()]
    );
}

#[tokio::test]
async fn existing_only_resolution_ignores_fresh() {
    let world = World::new();
    world
        .runtime
        .add_managed("default", "app", WORKSPACE, "v", 2220, "running");
    let opts = SessionCommandOptions {
        fresh: true,
        ..shell()
    };

    let target = resolve_existing(&world.ports(), &opts).await.expect("exists");

    assert!(!target.replaces_existing);
    assert!(!target.created_by_this_invocation);
}
