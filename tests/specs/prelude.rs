//! Shared fixtures for the heartbeat specs.

use drift_core::{FakeClock, Service, ServiceKind, ServiceUuid};
use drift_dir::FakeDirClient;
use drift_heartbeat::{
    AgentDeps, AgentEvent, FixedEndpoints, FixedSnapshot, HeartbeatAgent, HeartbeatConfig,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

pub type SpecAgent =
    HeartbeatAgent<Arc<FakeDirClient>, Arc<FixedSnapshot>, Arc<FixedEndpoints>, FakeClock>;

/// One service process plus its directory, fully wired.
pub struct Cluster {
    pub dir: Arc<FakeDirClient>,
    pub snapshots: Arc<FixedSnapshot>,
    pub clock: FakeClock,
    pub agent: SpecAgent,
    pub events: mpsc::Receiver<AgentEvent>,
}

/// Millisecond-scale intervals so spec runs stay fast.
pub fn spec_config() -> HeartbeatConfig {
    HeartbeatConfig {
        port: 32640,
        hostname: Some("localhost".to_string()),
        update_interval_ms: 50,
        conflict_retry_interval_ms: 5,
        ..HeartbeatConfig::default()
    }
}

pub fn cluster(services: Vec<Service>) -> Cluster {
    cluster_with(spec_config(), services)
}

pub fn cluster_with(config: HeartbeatConfig, services: Vec<Service>) -> Cluster {
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
            endpoints: Arc::new(FixedEndpoints::none()),
        },
        clock.clone(),
        Some(tx),
    );
    Cluster { dir, snapshots, clock, agent, events: rx }
}

/// An OSD record with a capacity payload.
pub fn osd(uuid: &str, free: u64) -> Service {
    let mut svc = Service::new(ServiceUuid::new(uuid), ServiceKind::Osd, "osd0");
    svc.data.insert("free".to_string(), free.to_string());
    svc
}

/// A volume record advertised by the given MRC.
pub fn volume(uuid: &str, mrc: &str) -> Service {
    let mut svc = Service::new(ServiceUuid::new(uuid), ServiceKind::Volume, "vol0");
    svc.data.insert("mrc".to_string(), mrc.to_string());
    svc.data.insert("policy".to_string(), "RW".to_string());
    svc
}

/// Poll `cond` until it holds. Panics after ~2s of (possibly virtual) time.
pub async fn wait_for(mut cond: impl FnMut() -> bool) {
    for _ in 0..2000 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}
