// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot configuration publish at startup.
//!
//! A convenience for operators, not a correctness requirement of the
//! heartbeat: the caller logs and swallows failures.

use crate::agent::AgentInner;
use crate::endpoints::EndpointSource;
use crate::snapshot::SnapshotSource;
use drift_core::{Clock, ConfigurationRecord};
use drift_dir::{DirClient, DirError, RetryPolicy};
use tracing::debug;

pub(crate) async fn publish_configuration<D, S, E, C>(
    inner: &AgentInner<D, S, E, C>,
) -> Result<(), DirError>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    let current = inner.dir.configuration_get(&inner.uuid, RetryPolicy::once()).await?;
    let record = ConfigurationRecord {
        uuid: inner.uuid.clone(),
        version: current.version,
        parameters: inner.config.parameters(),
    };
    let version = inner.dir.configuration_set(&record, RetryPolicy::once()).await?;
    debug!(uuid = %inner.uuid, version, "configuration published");
    Ok(())
}

#[cfg(test)]
#[path = "publisher_tests.rs"]
mod tests;
