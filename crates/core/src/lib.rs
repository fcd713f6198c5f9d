// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drift-core: domain types shared by Drift file system services

pub mod address;
pub mod clock;
pub mod configuration;
pub mod id;
pub mod service;

pub use address::{AddressMapping, AddressMappingSet, Scheme, DEFAULT_MATCH_NETWORK, DEFAULT_TTL_S};
pub use clock::{Clock, FakeClock, SystemClock};
pub use configuration::ConfigurationRecord;
pub use id::ServiceUuid;
pub use service::{
    is_mrc_key, is_static_key, Service, ServiceKind, ServiceSet, ServiceStatus,
    DO_NOT_SET_LAST_UPDATED_ATTR, MRC_KEY_PREFIX, STATIC_ATTR_PREFIX, STATUS_ATTR,
};
