// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The pause gate.
//!
//! Callers take a hold and wait until the worker reports idle; the worker
//! refuses to start a tick while any hold exists. Checking the hold count
//! and clearing the idle bit happen under one lock, so a caller whose
//! `pause` returned can never observe a registration in flight.

use parking_lot::Mutex;
use tokio::sync::Notify;

#[derive(Default)]
struct GateState {
    holds: u32,
    idle: bool,
}

/// Pause coordination between the worker and its callers.
///
/// Kept separate from the wake notifier and the renewal flag: collapsing
/// them would let an address-mapping renewal spuriously unblock a pause
/// waiter.
#[derive(Default)]
pub struct PauseGate {
    state: Mutex<GateState>,
    changed: Notify,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a hold and wait until the worker is idle.
    ///
    /// The hold stays in place until a matching [`resume`](Self::resume).
    /// If the returned future is dropped before the worker was observed
    /// idle, the hold is released again.
    pub async fn pause(&self) {
        self.state.lock().holds += 1;
        self.changed.notify_waiters();

        let mut hold = HoldRelease { gate: self, armed: true };
        loop {
            let notified = self.changed.notified();
            if self.state.lock().idle {
                hold.armed = false;
                return;
            }
            notified.await;
        }
    }

    /// Release one hold. Harmless when none is held.
    pub fn resume(&self) {
        self.release_hold();
    }

    /// Worker-side: wait until no holds exist, then mark the worker busy.
    /// The check and the transition are atomic.
    pub(crate) async fn enter_busy(&self) {
        loop {
            let notified = self.changed.notified();
            {
                let mut s = self.state.lock();
                if s.holds == 0 {
                    s.idle = false;
                    return;
                }
            }
            notified.await;
        }
    }

    /// Worker-side: report idle so pause waiters may proceed.
    pub(crate) fn mark_idle(&self) {
        self.state.lock().idle = true;
        self.changed.notify_waiters();
    }

    #[cfg(test)]
    pub(crate) fn holds(&self) -> u32 {
        self.state.lock().holds
    }

    fn release_hold(&self) {
        let mut s = self.state.lock();
        s.holds = s.holds.saturating_sub(1);
        drop(s);
        self.changed.notify_waiters();
    }
}

struct HoldRelease<'a> {
    gate: &'a PauseGate,
    armed: bool,
}

impl Drop for HoldRelease<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.gate.release_hold();
        }
    }
}

#[cfg(test)]
#[path = "gate_tests.rs"]
mod tests;
