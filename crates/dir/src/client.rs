// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Directory client trait and call-level policies.

use crate::error::DirError;
use async_trait::async_trait;
use drift_core::{AddressMappingSet, ConfigurationRecord, Service, ServiceSet, ServiceUuid};
use serde::{Deserialize, Serialize};

/// How many transport-level attempts a call may make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// Keep retrying at the transport's default cadence until the call
    /// completes. Used for the blocking first registration.
    Unbounded,
    /// At most this many attempts, then surface the error.
    Bounded(u32),
}

impl RetryPolicy {
    /// Single attempt, used by the periodic loop (the next tick retries).
    pub fn once() -> Self {
        RetryPolicy::Bounded(1)
    }
}

/// Identity a client presents to the directory.
///
/// The directory does not authenticate heartbeat traffic (token kind is
/// "none"); credentials exist for audit logging only. Concrete clients
/// bind them at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub groups: Vec<String>,
}

impl Credentials {
    /// Identity of the background heartbeat worker.
    pub fn heartbeat() -> Self {
        Self { username: "hb-thread".to_string(), groups: vec!["drift-services".to_string()] }
    }
}

/// Client-side view of the directory service.
///
/// Implementations are expected to be safe for concurrent use from the
/// heartbeat worker and a shutdown caller.
#[async_trait]
pub trait DirClient: Send + Sync + 'static {
    /// All records stored for `uuid` (empty when unregistered).
    async fn service_get_by_uuid(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<ServiceSet, DirError>;

    /// Write a service record. The echoed `version` must equal the last
    /// stored version (0 for a first write) or the directory rejects with
    /// [`DirError::ConcurrentModification`]. Returns the newly assigned
    /// version.
    async fn service_register(
        &self,
        service: &Service,
        retry: RetryPolicy,
    ) -> Result<u64, DirError>;

    /// Mark a service offline, letting clients drain within `grace_s`.
    async fn service_offline(
        &self,
        uuid: &ServiceUuid,
        grace_s: u32,
        retry: RetryPolicy,
    ) -> Result<(), DirError>;

    /// Stored configuration for `uuid`; a fresh zero-version record when
    /// none was ever published.
    async fn configuration_get(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<ConfigurationRecord, DirError>;

    /// Write a configuration record under the same version discipline as
    /// [`service_register`](Self::service_register).
    async fn configuration_set(
        &self,
        record: &ConfigurationRecord,
        retry: RetryPolicy,
    ) -> Result<u64, DirError>;

    /// The stored endpoint set for `uuid` (empty when none).
    async fn address_mappings_get(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<AddressMappingSet, DirError>;

    /// Replace the whole endpoint set for its UUID. The first entry
    /// carries the version cursor; an empty set is an unconditional
    /// replace. Returns the newly assigned version.
    async fn address_mappings_set(
        &self,
        set: &AddressMappingSet,
        retry: RetryPolicy,
    ) -> Result<u64, DirError>;
}

#[async_trait]
impl<T: DirClient> DirClient for std::sync::Arc<T> {
    async fn service_get_by_uuid(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<ServiceSet, DirError> {
        self.as_ref().service_get_by_uuid(uuid, retry).await
    }

    async fn service_register(
        &self,
        service: &Service,
        retry: RetryPolicy,
    ) -> Result<u64, DirError> {
        self.as_ref().service_register(service, retry).await
    }

    async fn service_offline(
        &self,
        uuid: &ServiceUuid,
        grace_s: u32,
        retry: RetryPolicy,
    ) -> Result<(), DirError> {
        self.as_ref().service_offline(uuid, grace_s, retry).await
    }

    async fn configuration_get(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<ConfigurationRecord, DirError> {
        self.as_ref().configuration_get(uuid, retry).await
    }

    async fn configuration_set(
        &self,
        record: &ConfigurationRecord,
        retry: RetryPolicy,
    ) -> Result<u64, DirError> {
        self.as_ref().configuration_set(record, retry).await
    }

    async fn address_mappings_get(
        &self,
        uuid: &ServiceUuid,
        retry: RetryPolicy,
    ) -> Result<AddressMappingSet, DirError> {
        self.as_ref().address_mappings_get(uuid, retry).await
    }

    async fn address_mappings_set(
        &self,
        set: &AddressMappingSet,
        retry: RetryPolicy,
    ) -> Result<u64, DirError> {
        self.as_ref().address_mappings_set(set, retry).await
    }
}
