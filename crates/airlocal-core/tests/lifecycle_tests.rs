//! Integration tests for the environment manager

mod common;

use airlocal_core::compose::COMPOSE_FILE_NAME;
use airlocal_core::provision::{EnvironmentManager, ProvisioningOrchestrator};
use airlocal_core::{Answers, Error, EnvironmentRegistry};
use common::*;
use std::fs;

async fn provisioned(registry: &EnvironmentRegistry, answers: &[Answers]) {
    let log = CallLog::new();
    let orch = ProvisioningOrchestrator::with_registry(registry.clone(), true, collaborators(&log));
    for a in answers {
        orch.create(a).await.unwrap();
    }
}

fn manager(registry: &EnvironmentRegistry, log: &CallLog) -> EnvironmentManager {
    EnvironmentManager::with_registry(registry.clone(), true, collaborators(log))
}

#[tokio::test]
async fn test_resolve_accepts_hostname_or_slug() {
    let (_tmp, registry) = sites_root();
    provisioned(&registry, &[scenario_a()]).await;
    let log = CallLog::new();
    let mgr = manager(&registry, &log);

    assert_eq!(mgr.resolve("docker.test").unwrap(), "docker-test");
    assert_eq!(mgr.resolve("docker-test").unwrap(), "docker-test");
    assert!(matches!(
        mgr.resolve("other.test"),
        Err(Error::EnvironmentNotFound { .. })
    ));
}

#[tokio::test]
async fn test_incomplete_only_resolvable_for_delete() {
    let (_tmp, registry) = sites_root();
    fs::create_dir_all(registry.path_for("broken-test")).unwrap();
    let log = CallLog::new();
    let mgr = manager(&registry, &log);

    assert!(mgr.resolve("broken.test").is_err());
    assert_eq!(mgr.resolve_for_delete("broken.test").unwrap(), "broken-test");
}

#[tokio::test]
async fn test_start_ensures_shared_resources_first() {
    let (_tmp, registry) = sites_root();
    provisioned(&registry, &[scenario_a()]).await;
    let log = CallLog::new();

    manager(&registry, &log).start("docker-test").await.unwrap();

    assert_eq!(log.calls(), ["runtime.ensure_shared", "runtime.up docker-test"]);
}

#[tokio::test]
async fn test_stop_all_visits_every_managed_environment() {
    let (_tmp, registry) = sites_root();
    provisioned(
        &registry,
        &[Answers::for_host("b.test"), Answers::for_host("a.test")],
    )
    .await;
    fs::create_dir_all(registry.path_for("incomplete")).unwrap();
    let log = CallLog::new();

    let stopped = manager(&registry, &log).stop_all().await.unwrap();

    assert_eq!(stopped, ["a-test", "b-test"]);
    assert_eq!(log.calls(), ["runtime.down a-test", "runtime.down b-test"]);
}

#[tokio::test]
async fn test_restart_failure_names_environment() {
    let (_tmp, registry) = sites_root();
    provisioned(&registry, &[scenario_a()]).await;
    let log = CallLog::new();
    log.fail_on("runtime.restart");

    let err = manager(&registry, &log)
        .restart("docker-test")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::LifecycleFailed { action: "restart", .. }));
    assert!(err.to_string().contains("docker-test"));
}

#[tokio::test]
async fn test_delete_managed_environment() {
    let (_tmp, registry) = sites_root();
    let answers = Answers {
        add_more_hosts: true,
        extra_hosts: vec!["www.docker.test".into()],
        ..scenario_a()
    };
    provisioned(&registry, &[answers]).await;
    let log = CallLog::new();

    let report = manager(&registry, &log).delete("docker-test").await.unwrap();

    assert_eq!(
        log.calls(),
        [
            "runtime.down docker-test",
            "db.delete docker-test",
            "hosts.remove docker.test,www.docker.test",
        ]
    );
    assert_eq!(report.removed_hosts, ["docker.test", "www.docker.test"]);
    assert!(report.warnings.is_empty());
    assert!(!registry.exists("docker-test"));
}

#[tokio::test]
async fn test_delete_incomplete_environment_skips_down_and_hosts() {
    let (_tmp, registry) = sites_root();
    let path = registry.path_for("broken-test");
    fs::create_dir_all(path.join("wordpress")).unwrap();
    let log = CallLog::new();

    let report = manager(&registry, &log).delete("broken-test").await.unwrap();

    assert_eq!(log.calls(), ["db.delete broken-test"]);
    assert!(report.removed_hosts.is_empty());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_delete_continues_past_collaborator_failures() {
    let (_tmp, registry) = sites_root();
    provisioned(&registry, &[scenario_a()]).await;
    let log = CallLog::new();
    log.fail_on("runtime.down");
    log.fail_on("db.delete");
    log.fail_on("hosts.remove");

    let report = manager(&registry, &log).delete("docker-test").await.unwrap();

    assert_eq!(report.warnings.len(), 3);
    assert!(!registry.exists("docker-test"));
}

#[tokio::test]
async fn test_delete_then_create_again() {
    let (_tmp, registry) = sites_root();
    provisioned(&registry, &[scenario_a()]).await;
    let log = CallLog::new();
    manager(&registry, &log).delete("docker-test").await.unwrap();

    provisioned(&registry, &[scenario_a()]).await;

    assert!(registry.path_for("docker-test").join(COMPOSE_FILE_NAME).is_file());
    assert_eq!(registry.list_environments().unwrap(), ["docker-test"]);
}

#[tokio::test]
async fn test_delete_missing_environment() {
    let (_tmp, registry) = sites_root();
    let log = CallLog::new();

    let err = manager(&registry, &log).delete("nope").await.unwrap_err();

    assert!(matches!(err, Error::EnvironmentNotFound { .. }));
    assert!(log.is_empty());
}

#[tokio::test]
async fn test_clear_cache() {
    let (_tmp, registry) = sites_root();
    let log = CallLog::new();

    manager(&registry, &log).clear_cache().await.unwrap();

    log.assert_called("runtime.clear_cache");
}

#[tokio::test]
async fn test_names_without_a_slug_never_reach_the_sites_root() {
    let (_tmp, registry) = sites_root();
    provisioned(
        &registry,
        &[Answers::for_host("docker.test"), Answers::for_host("other.test")],
    )
    .await;
    let log = CallLog::new();
    let mgr = manager(&registry, &log);

    for name in [".", "---", "", "  "] {
        assert!(matches!(
            mgr.resolve_for_delete(name),
            Err(Error::InvalidHostname { .. })
        ));
        assert!(mgr.resolve(name).is_err());
    }
    for slug in ["", ".", ".."] {
        assert!(matches!(
            mgr.delete(slug).await,
            Err(Error::EnvironmentNotFound { .. })
        ));
    }

    assert!(log.is_empty());
    assert!(registry.sites_root().is_dir());
    assert_eq!(
        registry.list_environments().unwrap(),
        ["docker-test", "other-test"]
    );
}
