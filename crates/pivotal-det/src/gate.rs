//! Bounded admission gate for worker threads.
//!
//! The gate tracks how many workers are currently active and blocks new
//! arrivals once the configured maximum is reached. [`ConcurrencyGate::acquire`]
//! hands back a [`GatePermit`] that frees its slot when dropped, so a
//! slot is returned on every exit path a worker can take, panics
//! included. [`ConcurrencyGate::drain`] blocks until every outstanding
//! permit is gone, which is the gate's teardown contract.

use std::sync::{Condvar, Mutex, PoisonError};

/// Counting gate that caps the number of concurrently active workers.
pub struct ConcurrencyGate {
    max_active: usize,
    active: Mutex<usize>,
    changed: Condvar,
}

/// Slot held by an admitted worker; dropping it frees the slot and wakes
/// gate waiters.
pub struct GatePermit<'a> {
    gate: &'a ConcurrencyGate,
}

impl ConcurrencyGate {
    /// Creates a gate admitting at most `max_active` workers at once.
    /// A zero maximum is treated as one.
    #[must_use]
    pub fn new(max_active: usize) -> Self {
        Self {
            max_active: max_active.max(1),
            active: Mutex::new(0),
            changed: Condvar::new(),
        }
    }

    /// Maximum number of simultaneously admitted workers.
    #[must_use]
    pub fn max_active(&self) -> usize {
        self.max_active
    }

    /// Number of currently admitted workers.
    #[must_use]
    pub fn active(&self) -> usize {
        *self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Blocks until a slot is free, then claims it.
    pub fn acquire(&self) -> GatePermit<'_> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        while *active >= self.max_active {
            active = self
                .changed
                .wait(active)
                .unwrap_or_else(PoisonError::into_inner);
        }
        *active += 1;
        GatePermit { gate: self }
    }

    /// Blocks until no worker holds a permit.
    pub fn drain(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        while *active > 0 {
            active = self
                .changed
                .wait(active)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn release(&self) {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        *active -= 1;
        // Both acquirers and drainers wait on the same condvar; wake them
        // all and let each re-check its condition.
        self.changed.notify_all();
    }
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.gate.release();
    }
}
