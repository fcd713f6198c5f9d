// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat configuration, derived from the host service's config.

use drift_core::Scheme;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// How often the worker re-registers, in milliseconds.
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 60_000;

/// Back-off between retries of a conflicted first registration.
pub const DEFAULT_CONFLICT_RETRY_MS: u64 = 5_000;

/// Knobs the host service hands the agent at construction.
///
/// `hostname`/`listen_address` decide how endpoints are derived: when
/// either is set it is authoritative, otherwise the agent enumerates
/// reachable interfaces through its [`EndpointSource`](crate::EndpointSource).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartbeatConfig {
    /// Port the service answers on.
    pub port: u16,
    /// Advertised hostname, when the operator pinned one.
    pub hostname: Option<String>,
    /// Explicit listen address, consulted when no hostname is pinned.
    pub listen_address: Option<String>,
    /// Wrap RPC in TLS.
    pub use_tls: bool,
    /// TLS handshake only, payload in the clear. Wins over `use_tls`.
    pub grid_tls: bool,
    /// Also advertise a datagram endpoint on the same host/port.
    pub advertise_udp: bool,
    /// Multihomed host: install the `SIGUSR2` handler that re-announces
    /// endpoints when the address set changes.
    pub renewal_signal: bool,
    pub update_interval_ms: u64,
    pub conflict_retry_interval_ms: u64,
    /// Drain window passed along with the offline notice, in seconds.
    pub offline_grace_s: u32,
}

impl Default for HeartbeatConfig {
    fn default() -> Self {
        Self {
            port: 0,
            hostname: None,
            listen_address: None,
            use_tls: false,
            grid_tls: false,
            advertise_udp: false,
            renewal_signal: false,
            update_interval_ms: env_ms("DRIFT_HB_INTERVAL_MS")
                .unwrap_or(DEFAULT_UPDATE_INTERVAL_MS),
            conflict_retry_interval_ms: env_ms("DRIFT_HB_RETRY_MS")
                .unwrap_or(DEFAULT_CONFLICT_RETRY_MS),
            offline_grace_s: 0,
        }
    }
}

impl HeartbeatConfig {
    /// Transport scheme, fixed once from the TLS flags.
    pub fn scheme(&self) -> Scheme {
        if self.grid_tls {
            Scheme::GridTls
        } else if self.use_tls {
            Scheme::Tls
        } else {
            Scheme::Plain
        }
    }

    /// The operator-pinned host, when one is configured and non-empty.
    /// Hostname wins over listen address.
    pub fn configured_host(&self) -> Option<&str> {
        self.hostname
            .as_deref()
            .into_iter()
            .chain(self.listen_address.as_deref())
            .map(str::trim)
            .find(|s| !s.is_empty())
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn conflict_retry_interval(&self) -> Duration {
        Duration::from_millis(self.conflict_retry_interval_ms)
    }

    /// The effective configuration as published to the directory.
    pub fn parameters(&self) -> HashMap<String, String> {
        let mut p = HashMap::new();
        p.insert("port".to_string(), self.port.to_string());
        if let Some(h) = &self.hostname {
            p.insert("hostname".to_string(), h.clone());
        }
        if let Some(a) = &self.listen_address {
            p.insert("listen_address".to_string(), a.clone());
        }
        p.insert("scheme".to_string(), self.scheme().as_str().to_string());
        p.insert("advertise_udp".to_string(), self.advertise_udp.to_string());
        p.insert("renewal_signal".to_string(), self.renewal_signal.to_string());
        p.insert("update_interval_ms".to_string(), self.update_interval_ms.to_string());
        p.insert(
            "conflict_retry_interval_ms".to_string(),
            self.conflict_retry_interval_ms.to_string(),
        );
        p.insert("offline_grace_s".to_string(), self.offline_grace_s.to_string());
        p
    }
}

fn env_ms(var: &str) -> Option<u64> {
    std::env::var(var).ok().and_then(|s| s.parse().ok())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
