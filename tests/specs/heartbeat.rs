//! Heartbeat lifecycle specs: registration, renewal, pause, shutdown.

use crate::prelude::*;
use drift_core::{Clock, Service, ServiceKind, ServiceUuid};
use drift_dir::{DirError, DirOp};
use drift_heartbeat::AgentEvent;
use std::time::Duration;
use tokio::time::timeout;

#[tokio::test]
async fn fresh_osd_registration() {
    let cluster = cluster(vec![osd("svc-1", 1000)]);
    cluster.agent.initialize().await.unwrap();

    let stored = cluster.dir.service(&ServiceUuid::new("svc-1")).unwrap();
    assert_eq!(stored.kind, ServiceKind::Osd);
    assert_eq!(stored.version, 1);
    assert_eq!(stored.data.get("free").map(String::as_str), Some("1000"));
    assert_eq!(stored.data.get("static.status").map(String::as_str), Some("1"));
    assert!(cluster.agent.last_heartbeat_ms() > 0);
}

#[tokio::test]
async fn static_attributes_are_preserved_across_ticks() {
    let cluster = cluster(vec![osd("svc-1", 1000)]);
    let mut prior = Service::new(ServiceUuid::new("svc-1"), ServiceKind::Osd, "osd0");
    prior.version = 7;
    prior.data.insert("free".to_string(), "500".to_string());
    prior.data.insert("static.status".to_string(), "3".to_string());
    prior.data.insert("static.do_not_set_last_updated".to_string(), "true".to_string());
    cluster.dir.seed_service(prior);

    cluster.agent.initialize().await.unwrap();

    let stored = cluster.dir.service(&ServiceUuid::new("svc-1")).unwrap();
    assert_eq!(stored.version, 8);
    assert_eq!(stored.data.get("free").map(String::as_str), Some("1000"));
    assert_eq!(stored.data.get("static.status").map(String::as_str), Some("3"));
    assert_eq!(
        stored.data.get("static.do_not_set_last_updated").map(String::as_str),
        Some("true")
    );
}

#[tokio::test]
async fn initialization_outlasts_directory_conflicts() {
    let cluster = cluster(vec![osd("svc-1", 1000)]);
    for _ in 0..5 {
        cluster.dir.fail_next(
            DirOp::ServiceRegister,
            DirError::ConcurrentModification { uuid: "svc-1".into() },
        );
    }

    timeout(Duration::from_secs(5), cluster.agent.initialize()).await.unwrap().unwrap();
    assert_eq!(cluster.dir.count(DirOp::ServiceRegister), 6);
}

#[tokio::test(start_paused = true)]
async fn repeated_renewals_coalesce_into_one_write() {
    let mut cluster = cluster(vec![osd("svc-1", 1000)]);
    cluster.agent.initialize().await.unwrap();
    cluster.dir.take_calls();
    let _handle = cluster.agent.start();
    assert_eq!(cluster.events.recv().await, Some(AgentEvent::Started));

    let ticks = cluster.dir.count(DirOp::ServiceRegister);
    for _ in 0..4 {
        cluster.agent.renew_address_mappings();
    }

    wait_for(|| cluster.dir.count(DirOp::AddressMappingsSet) >= 1).await;
    wait_for(|| cluster.dir.count(DirOp::ServiceRegister) >= ticks + 2).await;
    assert_eq!(cluster.dir.count(DirOp::AddressMappingsSet), 1);
    cluster.agent.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn paused_agent_issues_no_registrations() {
    let mut cluster = cluster(vec![osd("svc-1", 1000)]);
    cluster.agent.initialize().await.unwrap();
    let _handle = cluster.agent.start();
    assert_eq!(cluster.events.recv().await, Some(AgentEvent::Started));
    wait_for(|| cluster.dir.count(DirOp::ServiceRegister) >= 2).await;

    cluster.agent.pause().await;
    let frozen = cluster.dir.count(DirOp::ServiceRegister);
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(cluster.dir.count(DirOp::ServiceRegister), frozen);

    // The next tick runs within one update interval of the resume.
    cluster.agent.resume();
    wait_for(|| cluster.dir.count(DirOp::ServiceRegister) > frozen).await;
    cluster.agent.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_is_idempotent_and_stops_the_worker() {
    let mut cluster = cluster(vec![osd("svc-1", 1000)]);
    cluster.agent.initialize().await.unwrap();
    let handle = cluster.agent.start();
    assert_eq!(cluster.events.recv().await, Some(AgentEvent::Started));

    cluster.agent.shutdown().await;
    cluster.agent.shutdown().await;
    timeout(Duration::from_secs(2), handle).await.unwrap().unwrap();

    assert_eq!(cluster.events.recv().await, Some(AgentEvent::Stopped));
    assert_eq!(cluster.dir.count(DirOp::ServiceOffline), 1);
}

#[tokio::test]
async fn empty_endpoint_sets_are_written_without_a_cursor() {
    let mut config = spec_config();
    config.hostname = None;
    let cluster = cluster_with(config, vec![osd("svc-1", 1000)]);

    cluster.agent.initialize().await.unwrap();

    assert_eq!(cluster.dir.count(DirOp::AddressMappingsSet), 1);
    assert!(cluster.dir.mappings(&ServiceUuid::new("svc-1")).is_empty());
    assert_eq!(cluster.agent.advertised_host_name(), None);
}

#[tokio::test(start_paused = true)]
async fn heartbeat_timestamp_only_advances_on_success() {
    let mut cluster = cluster(vec![osd("svc-1", 1000)]);
    cluster.agent.initialize().await.unwrap();
    let initial = cluster.agent.last_heartbeat_ms();

    cluster.clock.advance(Duration::from_secs(30));
    // Every directory read fails for a while: the timestamp must not move.
    for _ in 0..3 {
        cluster
            .dir
            .fail_next(DirOp::ServiceGetByUuid, DirError::Transport("reset".into()));
    }
    let _handle = cluster.agent.start();
    assert_eq!(cluster.events.recv().await, Some(AgentEvent::Started));

    wait_for(|| cluster.dir.count(DirOp::ServiceGetByUuid) >= 3).await;
    // Once the directory recovers, the timestamp catches up.
    wait_for(|| cluster.agent.last_heartbeat_ms() > initial).await;
    assert_eq!(cluster.agent.last_heartbeat_ms(), cluster.clock.epoch_ms());
    cluster.agent.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn snapshot_changes_flow_into_the_next_tick() {
    let mut cluster = cluster(vec![osd("svc-1", 1000)]);
    cluster.agent.initialize().await.unwrap();
    let _handle = cluster.agent.start();
    assert_eq!(cluster.events.recv().await, Some(AgentEvent::Started));

    cluster.snapshots.replace(vec![osd("svc-1", 250)]);
    wait_for(|| {
        cluster
            .dir
            .service(&ServiceUuid::new("svc-1"))
            .and_then(|s| s.data.get("free").cloned())
            .as_deref()
            == Some("250")
    })
    .await;
    cluster.agent.shutdown().await;
}
