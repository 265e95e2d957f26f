//! Reusable generation-counted thread barrier.
//!
//! A rendezvous point for a fixed number of participants: every thread
//! calling [`CycleBarrier::wait`] blocks until all of them have arrived,
//! then all are released together. The last arriver resets the waiting
//! count, advances a generation tag and broadcasts; earlier arrivals wait
//! until the generation they entered under has passed. The generation tag
//! is what makes the barrier safe to reuse round after round — a thread
//! racing back into `wait` cannot be mistaken for a straggler from the
//! previous round.

use std::sync::{Condvar, Mutex, PoisonError};

struct BarrierState {
    waiting: usize,
    generation: u64,
}

/// A reusable rendezvous barrier for a fixed number of threads.
pub struct CycleBarrier {
    participants: usize,
    state: Mutex<BarrierState>,
    all_arrived: Condvar,
}

impl CycleBarrier {
    /// Creates a barrier for `participants` threads.
    ///
    /// # Panics
    ///
    /// Panics if `participants` is zero.
    #[must_use]
    pub fn new(participants: usize) -> Self {
        assert!(participants > 0, "barrier needs at least one participant");
        Self {
            participants,
            state: Mutex::new(BarrierState {
                waiting: 0,
                generation: 0,
            }),
            all_arrived: Condvar::new(),
        }
    }

    /// Number of participating threads.
    #[must_use]
    pub fn participants(&self) -> usize {
        self.participants
    }

    /// Blocks until every participant has called `wait` for the current
    /// round.
    pub fn wait(&self) {
        // A panicking peer must not wedge the rendezvous; the counter and
        // generation stay coherent under poison.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        let my_generation = state.generation;
        state.waiting += 1;

        if state.waiting == self.participants {
            state.waiting = 0;
            state.generation = state.generation.wrapping_add(1);
            self.all_arrived.notify_all();
        } else {
            while state.generation == my_generation {
                state = self
                    .all_arrived
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
        }
    }
}
