// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The service-data seam: what this process advertises each tick.

use drift_core::Service;
use parking_lot::Mutex;

/// Produces the current snapshot of service records to register.
///
/// Implemented by the host service. An OSD returns one record with its
/// capacity payload; an MRC additionally returns one `VOLUME` record per
/// volume it serves. Called once per tick, so implementations should be
/// cheap and must not block.
pub trait SnapshotSource: Send + Sync + 'static {
    fn services(&self) -> Vec<Service>;
}

/// Snapshot source backed by a replaceable record list.
///
/// Suits hosts whose record set is fixed at startup; the payload can
/// still be swapped wholesale between ticks with [`replace`](Self::replace).
pub struct FixedSnapshot {
    records: Mutex<Vec<Service>>,
}

impl FixedSnapshot {
    pub fn new(records: Vec<Service>) -> Self {
        Self { records: Mutex::new(records) }
    }

    /// Swap the snapshot the next tick will register.
    pub fn replace(&self, records: Vec<Service>) {
        *self.records.lock() = records;
    }
}

impl SnapshotSource for FixedSnapshot {
    fn services(&self) -> Vec<Service> {
        self.records.lock().clone()
    }
}

impl<T: SnapshotSource> SnapshotSource for std::sync::Arc<T> {
    fn services(&self) -> Vec<Service> {
        self.as_ref().services()
    }
}
