// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! OS-signal hook: `SIGUSR2` re-announces address mappings.
//!
//! Signals are process-global; the hook only arms the renewal flag of
//! the agent instance it was installed for, which is harmless if that
//! agent has already shut down.

use crate::agent::AgentInner;
use crate::endpoints::EndpointSource;
use crate::snapshot::SnapshotSource;
use drift_core::Clock;
use drift_dir::DirClient;
use std::sync::Arc;
use tracing::warn;

#[cfg(unix)]
pub(crate) fn install_renewal_signal<D, S, E, C>(inner: &Arc<AgentInner<D, S, E, C>>)
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    use tokio::signal::unix::{signal, SignalKind};
    use tracing::debug;

    let mut stream = match signal(SignalKind::user_defined2()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!(error = %e, "cannot install renewal signal handler, continuing without");
            return;
        }
    };

    let inner = Arc::clone(inner);
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = inner.quit.cancelled() => break,
                received = stream.recv() => match received {
                    Some(()) => {
                        debug!("renewal signal received, re-announcing address mappings");
                        inner.arm_renewal();
                    }
                    None => break,
                }
            }
        }
    });
}

#[cfg(not(unix))]
pub(crate) fn install_renewal_signal<D, S, E, C>(_inner: &Arc<AgentInner<D, S, E, C>>)
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    warn!("renewal signals are unsupported on this platform, continuing without");
}
