// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drift-heartbeat: the service heartbeat agent.
//!
//! Every Drift service process embeds one [`HeartbeatAgent`]. It keeps the
//! directory service informed of the process's existence, endpoints,
//! configuration, and liveness:
//!
//! - a blocking [`initialize`](HeartbeatAgent::initialize) performs the
//!   first registration (retrying version conflicts forever), registers
//!   address mappings, and publishes the effective configuration once;
//! - [`start`](HeartbeatAgent::start) spawns the background worker that
//!   re-registers every update interval;
//! - [`pause`](HeartbeatAgent::pause)/[`resume`](HeartbeatAgent::resume)
//!   let callers briefly hold the worker idle (e.g. around snapshots);
//! - [`renew_address_mappings`](HeartbeatAgent::renew_address_mappings)
//!   (also wired to `SIGUSR2` on multihomed hosts) re-announces endpoints
//!   on the next tick;
//! - [`shutdown`](HeartbeatAgent::shutdown) sends a best-effort offline
//!   notice and stops the worker.

pub mod agent;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod gate;
pub mod snapshot;

mod mappings;
mod publisher;
mod registrar;
mod signal;
mod worker;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use agent::{AgentDeps, AgentEvent, HeartbeatAgent};
pub use config::{HeartbeatConfig, DEFAULT_CONFLICT_RETRY_MS, DEFAULT_UPDATE_INTERVAL_MS};
pub use endpoints::{Endpoint, EndpointSource, FixedEndpoints};
pub use error::HeartbeatError;
pub use snapshot::{FixedSnapshot, SnapshotSource};
