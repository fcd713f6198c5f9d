// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service registration: read the directory's record, merge, write back.

use crate::agent::AgentInner;
use crate::endpoints::EndpointSource;
use crate::snapshot::SnapshotSource;
use drift_core::{
    is_mrc_key, Clock, Service, ServiceKind, ServiceStatus, MRC_KEY_PREFIX, STATUS_ATTR,
};
use drift_dir::{DirClient, DirError, RetryPolicy};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use tracing::debug;

/// Register every record in the current snapshot, in order.
///
/// Stops at the first error; the remaining records are picked up by the
/// next tick (or by the caller's retry during initialization).
pub(crate) async fn register_services<D, S, E, C>(
    inner: &AgentInner<D, S, E, C>,
    retry: RetryPolicy,
) -> Result<(), DirError>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    for fresh in inner.snapshots.services() {
        let existing = inner.dir.service_get_by_uuid(&fresh.uuid, retry).await?;
        let record = build_record(&fresh, existing.first());
        let version = inner.dir.service_register(&record, retry).await?;
        debug!(uuid = %record.uuid, version, "service registered");
        inner.last_heartbeat_ms.store(inner.clock.epoch_ms(), Ordering::Release);
    }
    Ok(())
}

/// The record to write, given the generator's `fresh` data and the
/// directory's `prior` record (if any).
///
/// - echoes the prior version (0 when unseen);
/// - carries every `static.*` attribute of the prior record verbatim,
///   inserting `static.status = AVAILABLE` if absent;
/// - for a volume updating an existing record, merges the MRC replica
///   list instead of overwriting it.
pub(crate) fn build_record(fresh: &Service, prior: Option<&Service>) -> Service {
    let mut data = match prior {
        Some(prior) if fresh.kind == ServiceKind::Volume => {
            merge_volume_data(&prior.data, &fresh.data)
        }
        _ => fresh.data.clone(),
    };

    if let Some(prior) = prior {
        for (k, v) in prior.static_attrs() {
            data.insert(k.to_string(), v.to_string());
        }
    }
    data.entry(STATUS_ATTR.to_string()).or_insert_with(|| ServiceStatus::Available.attr_value());

    Service {
        uuid: fresh.uuid.clone(),
        kind: fresh.kind,
        name: fresh.name.clone(),
        version: prior.map(|p| p.version).unwrap_or(0),
        last_updated_s: prior.map(|p| p.last_updated_s).unwrap_or(0),
        data,
    }
}

/// Merge a volume's data map so concurrently advertising MRCs accumulate
/// in the replica list instead of overwriting each other.
///
/// Every pre-existing `mrc`/`mrcN` entry is preserved. The writing MRC
/// (the generator's `mrc` value) joins under the next free index unless
/// one of the preserved entries already names it. Non-`mrc` generator
/// keys are copied verbatim.
pub(crate) fn merge_volume_data(
    prior: &HashMap<String, String>,
    fresh: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut data = HashMap::new();

    let mut max_replica_no: u32 = 0;
    for (key, value) in prior {
        if !is_mrc_key(key) {
            continue;
        }
        data.insert(key.clone(), value.clone());
        let n = if key == MRC_KEY_PREFIX {
            1
        } else {
            key[MRC_KEY_PREFIX.len()..].parse().unwrap_or(0)
        };
        max_replica_no = max_replica_no.max(n);
    }

    for (key, value) in fresh {
        if !is_mrc_key(key) {
            data.insert(key.clone(), value.clone());
        }
    }

    if let Some(writer) = fresh.get(MRC_KEY_PREFIX) {
        let already_listed = data.iter().any(|(k, v)| is_mrc_key(k) && v == writer);
        if !already_listed {
            data.insert(format!("{}{}", MRC_KEY_PREFIX, max_replica_no + 1), writer.clone());
        }
    }

    data
}

#[cfg(test)]
#[path = "registrar_tests.rs"]
mod tests;
