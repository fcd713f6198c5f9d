// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Address mappings: how clients locate a service.
//!
//! Each reachable endpoint of a service is one mapping record. The whole
//! set for a UUID is replaced atomically; the first entry of the set
//! carries the optimistic-version cursor.

use crate::id::ServiceUuid;
use serde::{Deserialize, Serialize};

/// Default mapping lifetime in seconds.
pub const DEFAULT_TTL_S: u32 = 3600;

/// Match-network wildcard: the mapping applies to clients on any network.
pub const DEFAULT_MATCH_NETWORK: &str = "*";

/// Transport scheme of an endpoint, fixed per service at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    /// Plain TCP RPC.
    Plain,
    /// TLS-wrapped RPC.
    Tls,
    /// TLS handshake only, payload in the clear (grid deployments).
    GridTls,
    /// Datagram variant for services that also answer over UDP.
    Udp,
}

impl Scheme {
    /// URI scheme token.
    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Plain => "rpc",
            Scheme::Tls => "rpcs",
            Scheme::GridTls => "rpcg",
            Scheme::Udp => "rpcu",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One reachable endpoint of a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressMapping {
    pub uuid: ServiceUuid,
    /// Version the directory last assigned; 0 when never written.
    /// Only the first mapping of a written set carries the cursor.
    pub version: u64,
    pub scheme: Scheme,
    /// Hostname or IP literal.
    pub address: String,
    pub port: u16,
    /// CIDR the mapping applies to, or `"*"`.
    pub match_network: String,
    pub ttl_s: u32,
}

impl AddressMapping {
    pub fn new(uuid: ServiceUuid, scheme: Scheme, address: impl Into<String>, port: u16) -> Self {
        Self {
            uuid,
            version: 0,
            scheme,
            address: address.into(),
            port,
            match_network: DEFAULT_MATCH_NETWORK.to_string(),
            ttl_s: DEFAULT_TTL_S,
        }
    }

    /// Wire form advertised to clients: `scheme://address:port`.
    pub fn uri(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.address, self.port)
    }
}

/// The full endpoint set of a service, written as one unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressMappingSet(pub Vec<AddressMapping>);

impl AddressMappingSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Version cursor of the set: the first mapping's version, or 0.
    pub fn version_cursor(&self) -> u64 {
        self.0.first().map(|m| m.version).unwrap_or(0)
    }
}

#[cfg(test)]
#[path = "address_tests.rs"]
mod tests;
