// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for the heartbeat crate's tests.

use crate::agent::{AgentDeps, AgentEvent, HeartbeatAgent};
use crate::config::HeartbeatConfig;
use crate::endpoints::FixedEndpoints;
use crate::snapshot::FixedSnapshot;
use drift_core::{FakeClock, Service, ServiceKind, ServiceUuid};
use drift_dir::FakeDirClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub(crate) type TestAgent =
    HeartbeatAgent<Arc<FakeDirClient>, Arc<FixedSnapshot>, Arc<FixedEndpoints>, FakeClock>;

pub(crate) struct TestContext {
    pub dir: Arc<FakeDirClient>,
    pub snapshots: Arc<FixedSnapshot>,
    pub clock: FakeClock,
    pub agent: TestAgent,
    pub events: mpsc::Receiver<AgentEvent>,
}

/// Config with millisecond-scale intervals so loop tests finish quickly.
pub(crate) fn test_config() -> HeartbeatConfig {
    HeartbeatConfig {
        port: 32640,
        hostname: Some("localhost".to_string()),
        update_interval_ms: 50,
        conflict_retry_interval_ms: 5,
        ..HeartbeatConfig::default()
    }
}

/// An OSD record whose uuid matches the default test agent identity.
pub(crate) fn osd_service(uuid: &str) -> Service {
    let mut svc = Service::new(ServiceUuid::new(uuid), ServiceKind::Osd, "osd0");
    svc.data.insert("free".to_string(), "1000".to_string());
    svc
}

pub(crate) fn setup(services: Vec<Service>) -> TestContext {
    setup_with(test_config(), services, FixedEndpoints::none())
}

pub(crate) fn setup_with(
    config: HeartbeatConfig,
    services: Vec<Service>,
    endpoints: FixedEndpoints,
) -> TestContext {
    let dir = Arc::new(FakeDirClient::new());
    let snapshots = Arc::new(FixedSnapshot::new(services));
    let clock = FakeClock::new();
    let (tx, rx) = mpsc::channel(16);
    let agent = HeartbeatAgent::new(
        ServiceUuid::new("svc-1"),
        config,
        AgentDeps {
            dir: Arc::clone(&dir),
            snapshots: Arc::clone(&snapshots),
            endpoints: Arc::new(endpoints),
        },
        clock.clone(),
        Some(tx),
    );
    TestContext { dir, snapshots, clock, agent, events: rx }
}

/// Poll `cond` until it holds. Panics after ~2s of (possibly virtual) time.
pub(crate) async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..2000 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}
