// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Service records as stored by the directory service.
//!
//! A service record is a versioned document: the directory advances
//! `version` on every successful write and rejects writes that echo a
//! stale version. The `data` map is partitioned by key prefix:
//!
//! - `static.*` keys are owned by the directory side and must be carried
//!   verbatim by writers.
//! - `mrc`, `mrc2`, `mrc3`, … name the MRC replicas of a volume.
//! - everything else is payload supplied by the registering service.

use crate::id::ServiceUuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Prefix of directory-owned attributes preserved verbatim across writes.
pub const STATIC_ATTR_PREFIX: &str = "static.";

/// Availability status attribute, always present after first registration.
pub const STATUS_ATTR: &str = "static.status";

/// Set by external tooling to stop the directory from refreshing the
/// record timestamp. Writers preserve it like any other static attribute.
pub const DO_NOT_SET_LAST_UPDATED_ATTR: &str = "static.do_not_set_last_updated";

/// Prefix of volume replica pointers (`mrc`, `mrc2`, `mrc3`, …).
pub const MRC_KEY_PREFIX: &str = "mrc";

/// Returns true for directory-owned `static.*` keys.
pub fn is_static_key(key: &str) -> bool {
    key.starts_with(STATIC_ATTR_PREFIX)
}

/// Returns true for volume replica pointer keys (`mrc`, `mrcN`).
pub fn is_mrc_key(key: &str) -> bool {
    key.starts_with(MRC_KEY_PREFIX)
}

/// The closed set of service kinds known to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceKind {
    Dir,
    Mrc,
    Osd,
    Volume,
}

impl ServiceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceKind::Dir => "DIR",
            ServiceKind::Mrc => "MRC",
            ServiceKind::Osd => "OSD",
            ServiceKind::Volume => "VOLUME",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Availability of a service, stored numerically under [`STATUS_ATTR`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ServiceStatus {
    Available,
    ToBeRemoved,
    Removed,
}

impl ServiceStatus {
    pub fn code(self) -> u32 {
        match self {
            ServiceStatus::Available => 1,
            ServiceStatus::ToBeRemoved => 2,
            ServiceStatus::Removed => 3,
        }
    }

    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(ServiceStatus::Available),
            2 => Some(ServiceStatus::ToBeRemoved),
            3 => Some(ServiceStatus::Removed),
            _ => None,
        }
    }

    /// The string form stored in a record's data map.
    pub fn attr_value(self) -> String {
        self.code().to_string()
    }
}

/// A versioned service record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub uuid: ServiceUuid,
    pub kind: ServiceKind,
    pub name: String,
    /// Version the directory last assigned; 0 when never written.
    pub version: u64,
    /// Seconds since epoch of the last directory-side refresh.
    pub last_updated_s: u64,
    pub data: HashMap<String, String>,
}

impl Service {
    pub fn new(uuid: ServiceUuid, kind: ServiceKind, name: impl Into<String>) -> Self {
        Self {
            uuid,
            kind,
            name: name.into(),
            version: 0,
            last_updated_s: 0,
            data: HashMap::new(),
        }
    }

    /// Directory-owned attributes of this record.
    pub fn static_attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.data
            .iter()
            .filter(|(k, _)| is_static_key(k))
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Status parsed from the data map, if present and well-formed.
    pub fn status(&self) -> Option<ServiceStatus> {
        self.data
            .get(STATUS_ATTR)
            .and_then(|v| v.parse::<u32>().ok())
            .and_then(ServiceStatus::from_code)
    }

    /// True when external tooling pinned the record timestamp.
    pub fn last_updated_is_pinned(&self) -> bool {
        self.data.contains_key(DO_NOT_SET_LAST_UPDATED_ATTR)
    }
}

/// Set of service records returned by a directory read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceSet(pub Vec<Service>);

impl ServiceSet {
    pub fn first(&self) -> Option<&Service> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
