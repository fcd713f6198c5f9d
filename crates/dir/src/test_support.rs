// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory directory for tests.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.
//!
//! `FakeDirClient` enforces the same optimistic-version rule as the real
//! directory: a write must echo the stored version (0 for a first write)
//! or it fails with `ConcurrentModification`, and every successful write
//! stores `version + 1`. Every call is appended to a log so tests can
//! assert on traffic (e.g. no register while paused), and errors can be
//! queued per operation to exercise failure paths.

use crate::client::{DirClient, RetryPolicy};
use crate::error::DirError;
use async_trait::async_trait;
use drift_core::{AddressMappingSet, ConfigurationRecord, Service, ServiceSet, ServiceUuid};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

/// One observed directory call.
#[derive(Debug, Clone, PartialEq)]
pub enum DirCall {
    ServiceGetByUuid { uuid: String, retry: RetryPolicy },
    ServiceRegister { uuid: String, version: u64, retry: RetryPolicy },
    ServiceOffline { uuid: String, grace_s: u32 },
    ConfigurationGet { uuid: String },
    ConfigurationSet { uuid: String, version: u64 },
    AddressMappingsGet { uuid: String },
    AddressMappingsSet { uuid: String, len: usize, version: u64 },
}

/// Operations errors can be queued against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirOp {
    ServiceGetByUuid,
    ServiceRegister,
    ServiceOffline,
    ConfigurationGet,
    ConfigurationSet,
    AddressMappingsGet,
    AddressMappingsSet,
}

#[derive(Default)]
struct FakeDirState {
    services: HashMap<String, Service>,
    mappings: HashMap<String, AddressMappingSet>,
    configurations: HashMap<String, ConfigurationRecord>,
    calls: Vec<DirCall>,
    errors: HashMap<DirOp, VecDeque<DirError>>,
}

/// In-memory [`DirClient`] with a call log and failure injection.
#[derive(Default)]
pub struct FakeDirClient {
    state: Mutex<FakeDirState>,
}

impl FakeDirClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a service record as-is (version included), bypassing the
    /// version check. For arranging pre-existing directory state.
    pub fn seed_service(&self, service: Service) {
        let mut state = self.state.lock();
        state.services.insert(service.uuid.as_str().to_string(), service);
    }

    pub fn seed_mappings(&self, uuid: &ServiceUuid, set: AddressMappingSet) {
        self.state.lock().mappings.insert(uuid.as_str().to_string(), set);
    }

    pub fn seed_configuration(&self, record: ConfigurationRecord) {
        let mut state = self.state.lock();
        state.configurations.insert(record.uuid.as_str().to_string(), record);
    }

    /// Queue an error for the next call of `op` (FIFO per operation).
    pub fn fail_next(&self, op: DirOp, error: DirError) {
        self.state.lock().errors.entry(op).or_default().push_back(error);
    }

    /// The stored record for `uuid`, if any.
    pub fn service(&self, uuid: &ServiceUuid) -> Option<Service> {
        self.state.lock().services.get(uuid.as_str()).cloned()
    }

    pub fn mappings(&self, uuid: &ServiceUuid) -> AddressMappingSet {
        self.state.lock().mappings.get(uuid.as_str()).cloned().unwrap_or_default()
    }

    pub fn configuration(&self, uuid: &ServiceUuid) -> Option<ConfigurationRecord> {
        self.state.lock().configurations.get(uuid.as_str()).cloned()
    }

    /// Everything observed so far, in call order.
    pub fn calls(&self) -> Vec<DirCall> {
        self.state.lock().calls.clone()
    }

    /// Drain the call log.
    pub fn take_calls(&self) -> Vec<DirCall> {
        std::mem::take(&mut self.state.lock().calls)
    }

    pub fn count(&self, op: DirOp) -> usize {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|c| {
                matches!(
                    (op, c),
                    (DirOp::ServiceGetByUuid, DirCall::ServiceGetByUuid { .. })
                        | (DirOp::ServiceRegister, DirCall::ServiceRegister { .. })
                        | (DirOp::ServiceOffline, DirCall::ServiceOffline { .. })
                        | (DirOp::ConfigurationGet, DirCall::ConfigurationGet { .. })
                        | (DirOp::ConfigurationSet, DirCall::ConfigurationSet { .. })
                        | (DirOp::AddressMappingsGet, DirCall::AddressMappingsGet { .. })
                        | (DirOp::AddressMappingsSet, DirCall::AddressMappingsSet { .. })
                )
            })
            .count()
    }

    fn record_and_check(state: &mut FakeDirState, op: DirOp, call: DirCall) -> Result<(), DirError> {
        state.calls.push(call);
        if let Some(err) = state.errors.get_mut(&op).and_then(|q| q.pop_front()) {
            return Err(err);
        }
        Ok(())
    }
}

#[async_trait]
impl DirClient for FakeDirClient {
    async fn service_get_by_uuid(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<ServiceSet, DirError> {
        let mut state = self.state.lock();
        Self::record_and_check(
            &mut state,
            DirOp::ServiceGetByUuid,
            DirCall::ServiceGetByUuid { uuid: uuid.as_str().to_string(), retry },
        )?;
        Ok(state
            .services
            .get(uuid.as_str())
            .map(|s| ServiceSet(vec![s.clone()]))
            .unwrap_or_default())
    }

    async fn service_register(
        &self,
        service: &Service,
        retry: RetryPolicy,
    ) -> Result<u64, DirError> {
        let mut state = self.state.lock();
        Self::record_and_check(
            &mut state,
            DirOp::ServiceRegister,
            DirCall::ServiceRegister {
                uuid: service.uuid.as_str().to_string(),
                version: service.version,
                retry,
            },
        )?;
        let stored_version =
            state.services.get(service.uuid.as_str()).map(|s| s.version).unwrap_or(0);
        if service.version != stored_version {
            return Err(DirError::ConcurrentModification {
                uuid: service.uuid.as_str().to_string(),
            });
        }
        let mut stored = service.clone();
        stored.version = stored_version + 1;
        state.services.insert(service.uuid.as_str().to_string(), stored);
        Ok(stored_version + 1)
    }

    async fn service_offline(
        &self,
        uuid: &ServiceUuid,
        grace_s: u32,
        _retry: RetryPolicy,
    ) -> Result<(), DirError> {
        let mut state = self.state.lock();
        Self::record_and_check(
            &mut state,
            DirOp::ServiceOffline,
            DirCall::ServiceOffline { uuid: uuid.as_str().to_string(), grace_s },
        )?;
        if let Some(svc) = state.services.get_mut(uuid.as_str()) {
            svc.data.insert(
                drift_core::STATUS_ATTR.to_string(),
                drift_core::ServiceStatus::Removed.attr_value(),
            );
        }
        Ok(())
    }

    async fn configuration_get(
        &self,
        uuid: &ServiceUuid,
        _retry: RetryPolicy,
    ) -> Result<ConfigurationRecord, DirError> {
        let mut state = self.state.lock();
        Self::record_and_check(
            &mut state,
            DirOp::ConfigurationGet,
            DirCall::ConfigurationGet { uuid: uuid.as_str().to_string() },
        )?;
        Ok(state
            .configurations
            .get(uuid.as_str())
            .cloned()
            .unwrap_or_else(|| ConfigurationRecord::new(uuid.clone())))
    }

    async fn configuration_set(
        &self,
        record: &ConfigurationRecord,
        _retry: RetryPolicy,
    ) -> Result<u64, DirError> {
        let mut state = self.state.lock();
        Self::record_and_check(
            &mut state,
            DirOp::ConfigurationSet,
            DirCall::ConfigurationSet {
                uuid: record.uuid.as_str().to_string(),
                version: record.version,
            },
        )?;
        let stored_version =
            state.configurations.get(record.uuid.as_str()).map(|c| c.version).unwrap_or(0);
        if record.version != stored_version {
            return Err(DirError::ConcurrentModification {
                uuid: record.uuid.as_str().to_string(),
            });
        }
        let mut stored = record.clone();
        stored.version = stored_version + 1;
        state.configurations.insert(record.uuid.as_str().to_string(), stored);
        Ok(stored_version + 1)
    }

    async fn address_mappings_get(
        &self,
        uuid: &ServiceUuid,
        _retry: RetryPolicy,
    ) -> Result<AddressMappingSet, DirError> {
        let mut state = self.state.lock();
        Self::record_and_check(
            &mut state,
            DirOp::AddressMappingsGet,
            DirCall::AddressMappingsGet { uuid: uuid.as_str().to_string() },
        )?;
        Ok(state.mappings.get(uuid.as_str()).cloned().unwrap_or_default())
    }

    async fn address_mappings_set(
        &self,
        set: &AddressMappingSet,
        _retry: RetryPolicy,
    ) -> Result<u64, DirError> {
        let mut state = self.state.lock();
        let uuid = set.0.first().map(|m| m.uuid.as_str().to_string()).unwrap_or_default();
        Self::record_and_check(
            &mut state,
            DirOp::AddressMappingsSet,
            DirCall::AddressMappingsSet {
                uuid: uuid.clone(),
                len: set.0.len(),
                version: set.version_cursor(),
            },
        )?;
        if set.is_empty() {
            // No entries, no cursor, nothing to store. The call itself is
            // still logged above.
            return Ok(0);
        }
        let stored_version =
            state.mappings.get(&uuid).map(|s| s.version_cursor()).unwrap_or(0);
        if set.version_cursor() != stored_version {
            return Err(DirError::ConcurrentModification { uuid });
        }
        let mut stored = set.clone();
        if let Some(first) = stored.0.first_mut() {
            first.version = stored_version + 1;
        }
        state.mappings.insert(uuid, stored);
        Ok(stored_version + 1)
    }
}

#[cfg(test)]
#[path = "test_support_tests.rs"]
mod tests;
