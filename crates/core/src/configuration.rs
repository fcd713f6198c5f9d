// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-service configuration records published to the directory.

use crate::id::ServiceUuid;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Effective configuration of a service as key/value pairs.
///
/// Published once at startup so operators can inspect what a service is
/// actually running with. Versioned like every directory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigurationRecord {
    pub uuid: ServiceUuid,
    /// Version the directory last assigned; 0 when never written.
    pub version: u64,
    pub parameters: HashMap<String, String>,
}

impl ConfigurationRecord {
    pub fn new(uuid: ServiceUuid) -> Self {
        Self { uuid, version: 0, parameters: HashMap::new() }
    }
}
