// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Heartbeat agent errors.

use drift_dir::DirError;
use thiserror::Error;

/// Errors surfaced by the agent's public operations.
///
/// The periodic loop never surfaces errors — it logs and retries on the
/// next tick. Only initialization can fail outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeartbeatError {
    /// The blocking first registration failed with something other than
    /// a version conflict (conflicts are retried forever).
    #[error("initial service registration failed: {0}")]
    InitialRegistration(#[source] DirError),
}
