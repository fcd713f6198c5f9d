// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The network-enumeration seam: which addresses this process is
//! reachable at when no hostname is pinned in configuration.

use drift_core::{Scheme, DEFAULT_MATCH_NETWORK, DEFAULT_TTL_S};

/// One reachable address, before it is stamped with the service identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    /// Hostname or IP literal.
    pub address: String,
    /// CIDR of the network this endpoint serves, or `"*"`.
    pub match_network: String,
    pub ttl_s: u32,
}

impl Endpoint {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            match_network: DEFAULT_MATCH_NETWORK.to_string(),
            ttl_s: DEFAULT_TTL_S,
        }
    }

    /// Restrict the endpoint to one network (multihomed hosts).
    pub fn with_match_network(mut self, cidr: impl Into<String>) -> Self {
        self.match_network = cidr.into();
        self
    }
}

/// Enumerates the endpoints this process is reachable at.
///
/// Implemented outside the agent (the host's network layer). Called on
/// every address-mapping registration, so a multihomed host picks up
/// interface changes on the next renewal.
pub trait EndpointSource: Send + Sync + 'static {
    fn reachable_endpoints(&self, port: u16, scheme: Scheme) -> Vec<Endpoint>;
}

/// Endpoint source with a fixed answer, independent of port and scheme.
pub struct FixedEndpoints {
    endpoints: Vec<Endpoint>,
}

impl FixedEndpoints {
    pub fn new(endpoints: Vec<Endpoint>) -> Self {
        Self { endpoints }
    }

    /// A source that reports no reachable endpoints.
    pub fn none() -> Self {
        Self::new(Vec::new())
    }
}

impl EndpointSource for FixedEndpoints {
    fn reachable_endpoints(&self, _port: u16, _scheme: Scheme) -> Vec<Endpoint> {
        self.endpoints.clone()
    }
}

impl<T: EndpointSource> EndpointSource for std::sync::Arc<T> {
    fn reachable_endpoints(&self, port: u16, scheme: Scheme) -> Vec<Endpoint> {
        self.as_ref().reachable_endpoints(port, scheme)
    }
}
