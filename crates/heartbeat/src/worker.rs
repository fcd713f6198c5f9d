// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The periodic loop.

use crate::agent::AgentInner;
use crate::endpoints::EndpointSource;
use crate::snapshot::SnapshotSource;
use crate::{mappings, registrar};
use drift_core::Clock;
use drift_dir::{DirClient, RetryPolicy};
use std::sync::atomic::Ordering;
use tracing::{error, info, warn};

impl<D, S, E, C> AgentInner<D, S, E, C>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    /// One tick per update interval until shutdown:
    /// pause gate → service registration → pending endpoint renewal →
    /// idle mark → interval sleep.
    ///
    /// Registration errors never end the loop; the next tick retries.
    /// Cancellation is observed at the gate and around RPCs, but the
    /// interval sleep itself is only woken early — the loop re-checks the
    /// quit token before doing anything else.
    pub(crate) async fn run_loop(&self) {
        while !self.quit.is_cancelled() {
            tokio::select! {
                _ = self.quit.cancelled() => break,
                _ = self.gate.enter_busy() => {}
            }

            tokio::select! {
                _ = self.quit.cancelled() => break,
                res = registrar::register_services(self, RetryPolicy::once()) => match res {
                    Ok(()) => {}
                    Err(e) if e.is_concurrent_modification() => {
                        info!(error = %e, "registration raced a concurrent update, next tick retries");
                    }
                    Err(e) => {
                        error!(error = %e, "service registration failed, next tick retries");
                    }
                }
            }

            if self.renew.swap(false, Ordering::AcqRel) {
                tokio::select! {
                    _ = self.quit.cancelled() => break,
                    res = mappings::register_address_mappings(self) => {
                        if let Err(e) = res {
                            warn!(error = %e, "address-mapping renewal failed, re-arming");
                            self.renew.store(true, Ordering::Release);
                        }
                    }
                }
            }

            if self.quit.is_cancelled() {
                break;
            }

            self.gate.mark_idle();

            // A renewal that arrived mid-tick skips the sleep entirely.
            if !self.renew.load(Ordering::Acquire) {
                let _ = tokio::time::timeout(self.config.update_interval(), self.wake.notified())
                    .await;
            }
        }
    }
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
