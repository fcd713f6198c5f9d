// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Address-mapping registration: derive the endpoint set, publish it.

use crate::agent::AgentInner;
use crate::endpoints::EndpointSource;
use crate::snapshot::SnapshotSource;
use drift_core::{AddressMapping, AddressMappingSet, Clock, Scheme};
use drift_dir::{DirClient, DirError, RetryPolicy};
use tracing::{debug, warn};

/// Compute the current endpoint set and write it to the directory as one
/// unit, carrying the version cursor on the first entry.
pub(crate) async fn register_address_mappings<D, S, E, C>(
    inner: &AgentInner<D, S, E, C>,
) -> Result<(), DirError>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    let endpoints = derive_endpoints(inner).await;

    if let Some(first) = endpoints.first() {
        *inner.advertised_host.lock() = Some(first.address.clone());
    }

    let current = inner.dir.address_mappings_get(&inner.uuid, RetryPolicy::once()).await?;
    let mut set = AddressMappingSet(endpoints);
    if let Some(first) = set.0.first_mut() {
        first.version = current.version_cursor();
    }
    inner.dir.address_mappings_set(&set, RetryPolicy::once()).await?;
    debug!(uuid = %inner.uuid, endpoints = set.0.len(), "address mappings registered");
    Ok(())
}

/// The endpoint set to advertise.
///
/// A configured hostname or listen address is authoritative: one primary
/// mapping (plus a UDP sibling when enabled). Without one, the network
/// layer enumerates reachable endpoints per scheme.
async fn derive_endpoints<D, S, E, C>(inner: &AgentInner<D, S, E, C>) -> Vec<AddressMapping>
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    let config = &inner.config;
    let scheme = config.scheme();

    if let Some(configured) = config.configured_host() {
        // A hostname from a reverse lookup may carry a leading slash.
        let host = configured.strip_prefix('/').unwrap_or(configured);

        // Resolution is for observability only: an unresolvable name is
        // still advertised as configured.
        if let Err(e) = tokio::net::lookup_host((host, config.port)).await {
            warn!(host, error = %e, "configured host does not resolve");
        }

        let mut mappings =
            vec![AddressMapping::new(inner.uuid.clone(), scheme, host, config.port)];
        if config.advertise_udp {
            mappings.push(AddressMapping::new(inner.uuid.clone(), Scheme::Udp, host, config.port));
        }
        return mappings;
    }

    let mut mappings: Vec<AddressMapping> = inner
        .endpoints
        .reachable_endpoints(config.port, scheme)
        .into_iter()
        .map(|ep| to_mapping(inner, scheme, ep))
        .collect();
    if config.advertise_udp {
        mappings.extend(
            inner
                .endpoints
                .reachable_endpoints(config.port, Scheme::Udp)
                .into_iter()
                .map(|ep| to_mapping(inner, Scheme::Udp, ep)),
        );
    }
    mappings
}

fn to_mapping<D, S, E, C>(
    inner: &AgentInner<D, S, E, C>,
    scheme: Scheme,
    ep: crate::endpoints::Endpoint,
) -> AddressMapping
where
    D: DirClient,
    S: SnapshotSource,
    E: EndpointSource,
    C: Clock,
{
    let mut mapping = AddressMapping::new(inner.uuid.clone(), scheme, ep.address, inner.config.port);
    mapping.match_network = ep.match_network;
    mapping.ttl_s = ep.ttl_s;
    mapping
}

#[cfg(test)]
#[path = "mappings_tests.rs"]
mod tests;
