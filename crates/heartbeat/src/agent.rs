// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The heartbeat agent: construction, public operations, lifecycle.

use crate::config::HeartbeatConfig;
use crate::endpoints::EndpointSource;
use crate::error::HeartbeatError;
use crate::gate::PauseGate;
use crate::snapshot::SnapshotSource;
use crate::{mappings, publisher, registrar, signal};
use drift_core::{Clock, ServiceUuid};
use drift_dir::{DirClient, RetryPolicy};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Lifecycle notifications published by the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentEvent {
    /// The worker entered its periodic loop.
    Started,
    /// The worker left the loop after a shutdown.
    Stopped,
    /// The worker died unexpectedly.
    Crashed { message: String },
}

/// External collaborators handed to the agent at construction.
pub struct AgentDeps<D, S, E> {
    /// Directory client.
    pub dir: D,
    /// Produces the records to register each tick.
    pub snapshots: S,
    /// Enumerates reachable endpoints when no hostname is configured.
    pub endpoints: E,
}

/// Shared state behind the cheap-clone [`HeartbeatAgent`] handle.
pub(crate) struct AgentInner<D, S, E, C> {
    pub(crate) uuid: ServiceUuid,
    pub(crate) config: HeartbeatConfig,
    pub(crate) dir: D,
    pub(crate) snapshots: S,
    pub(crate) endpoints: E,
    pub(crate) clock: C,
    events: Option<mpsc::Sender<AgentEvent>>,

    // Coordination fabric. Three deliberately separate primitives: the
    // quit token, the pause gate, and the renewal flag + wake notifier.
    pub(crate) quit: CancellationToken,
    pub(crate) gate: PauseGate,
    pub(crate) renew: AtomicBool,
    pub(crate) wake: Notify,

    pub(crate) last_heartbeat_ms: AtomicU64,
    pub(crate) advertised_host: Mutex<Option<String>>,
    offline_sent: AtomicBool,
}

impl<D, S, E, C> AgentInner<D, S, E, C>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    /// Arm the renewal flag and wake the worker. Safe from any task,
    /// including after shutdown (the write is then simply never read).
    pub(crate) fn arm_renewal(&self) {
        self.renew.store(true, Ordering::Release);
        self.wake.notify_one();
    }

    pub(crate) fn emit(&self, event: AgentEvent) {
        if let Some(tx) = &self.events {
            if tx.try_send(event).is_err() {
                debug!("lifecycle event dropped, subscriber gone or lagging");
            }
        }
    }
}

/// The service heartbeat agent. One per service process.
///
/// Cloning yields another handle onto the same agent; all public
/// operations are safe from any task.
pub struct HeartbeatAgent<D, S, E, C> {
    inner: Arc<AgentInner<D, S, E, C>>,
}

impl<D, S, E, C> Clone for HeartbeatAgent<D, S, E, C> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<D, S, E, C> HeartbeatAgent<D, S, E, C>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    /// Build an agent for `uuid`. Pass an `events` sender to observe
    /// lifecycle transitions; `None` silences them.
    pub fn new(
        uuid: ServiceUuid,
        config: HeartbeatConfig,
        deps: AgentDeps<D, S, E>,
        clock: C,
        events: Option<mpsc::Sender<AgentEvent>>,
    ) -> Self {
        Self {
            inner: Arc::new(AgentInner {
                uuid,
                config,
                dir: deps.dir,
                snapshots: deps.snapshots,
                endpoints: deps.endpoints,
                clock,
                events,
                quit: CancellationToken::new(),
                gate: PauseGate::new(),
                renew: AtomicBool::new(false),
                wake: Notify::new(),
                last_heartbeat_ms: AtomicU64::new(0),
                advertised_host: Mutex::new(None),
                offline_sent: AtomicBool::new(false),
            }),
        }
    }

    /// Blocking first registration.
    ///
    /// Version conflicts are retried forever at the conflict-retry
    /// interval — a service must not give up because its record raced a
    /// concurrent update. Any other registration error is fatal. The
    /// follow-up address-mapping registration and configuration publish
    /// are best-effort.
    pub async fn initialize(&self) -> Result<(), HeartbeatError> {
        let inner = self.inner.as_ref();
        loop {
            match registrar::register_services(inner, RetryPolicy::Unbounded).await {
                Ok(()) => break,
                Err(e) if e.is_concurrent_modification() => {
                    info!(error = %e, "first registration raced a concurrent update, retrying");
                    tokio::time::sleep(inner.config.conflict_retry_interval()).await;
                }
                Err(e) => return Err(HeartbeatError::InitialRegistration(e)),
            }
        }
        if let Err(e) = mappings::register_address_mappings(inner).await {
            warn!(error = %e, "address-mapping registration failed during startup");
        }
        if let Err(e) = publisher::publish_configuration(inner).await {
            warn!(error = %e, "configuration publish failed");
        }
        Ok(())
    }

    /// Spawn the background worker (and the renewal signal hook when
    /// configured). Publishes `Started` immediately, `Stopped` on a clean
    /// exit, `Crashed` if the worker dies.
    pub fn start(&self) -> JoinHandle<()> {
        if self.inner.config.renewal_signal {
            signal::install_renewal_signal(&self.inner);
        }
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            inner.emit(AgentEvent::Started);
            let worker = tokio::spawn({
                let inner = Arc::clone(&inner);
                async move { inner.run_loop().await }
            });
            match worker.await {
                Ok(()) => inner.emit(AgentEvent::Stopped),
                Err(e) => {
                    let message = e.to_string();
                    warn!(error = %message, "heartbeat worker died");
                    inner.emit(AgentEvent::Crashed { message });
                }
            }
        })
    }

    /// Best-effort offline notice, then stop the worker. Idempotent and
    /// safe from any task; does not wait for the worker to exit.
    pub async fn shutdown(&self) {
        let inner = self.inner.as_ref();
        if !inner.offline_sent.swap(true, Ordering::AcqRel) {
            let grace = inner.config.offline_grace_s;
            if let Err(e) = inner.dir.service_offline(&inner.uuid, grace, RetryPolicy::once()).await
            {
                warn!(error = %e, "offline notice failed");
            }
        }
        inner.quit.cancel();
        inner.wake.notify_one();
    }

    /// Hold the worker idle. Returns once no registration RPC is in
    /// flight; the worker stays idle until the matching [`resume`](Self::resume).
    pub async fn pause(&self) {
        self.inner.gate.pause().await;
    }

    /// Release one pause hold.
    pub fn resume(&self) {
        self.inner.gate.resume();
    }

    /// Re-announce endpoints on the next tick. Wakes a sleeping worker;
    /// multiple calls before that tick coalesce into one write.
    pub fn renew_address_mappings(&self) {
        self.inner.arm_renewal();
    }

    /// Epoch milliseconds of the last successful service registration,
    /// 0 before the first one.
    pub fn last_heartbeat_ms(&self) -> u64 {
        self.inner.last_heartbeat_ms.load(Ordering::Acquire)
    }

    /// The host string reported to clients, once known.
    pub fn advertised_host_name(&self) -> Option<String> {
        self.inner.advertised_host.lock().clone()
    }

    pub fn uuid(&self) -> &ServiceUuid {
        &self.inner.uuid
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &Arc<AgentInner<D, S, E, C>> {
        &self.inner
    }
}

#[cfg(test)]
#[path = "agent_tests.rs"]
mod tests;
