// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! drift-dir: the directory service interface consumed by Drift services.
//!
//! The directory (DIR) is the cluster-wide registry of services, address
//! mappings, and configurations. This crate defines the client-side seam —
//! the [`DirClient`] trait and its error classification — without binding
//! to a concrete RPC transport.

pub mod client;
pub mod error;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use client::{Credentials, DirClient, RetryPolicy};
pub use error::DirError;

#[cfg(any(test, feature = "test-support"))]
pub use test_support::{DirCall, DirOp, FakeDirClient};
