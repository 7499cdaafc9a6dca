//! One-shot broadcast gate
//!
//! A gate starts closed and can be opened exactly once. Every thread
//! blocked in [`Gate::wait`] is woken by the single `open()` transition;
//! threads arriving afterwards pass straight through. There is no way to
//! close a gate again.

use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

#[derive(Debug, Default)]
struct GateState {
    open: bool,
    /// Threads currently parked in `wait`
    waiting: usize,
}

/// One-shot broadcast signal
#[derive(Debug, Default)]
pub struct Gate {
    state: Mutex<GateState>,
    cond: Condvar,
}

impl Gate {
    /// Create a closed gate
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate and wake every waiter
    ///
    /// Returns `true` for the call that performed the transition and
    /// `false` for any later call.
    pub fn open(&self) -> bool {
        let mut state = self.state.lock();
        if state.open {
            return false;
        }
        state.open = true;
        self.cond.notify_all();
        true
    }

    /// Block until the gate is open
    pub fn wait(&self) {
        let mut state = self.state.lock();
        state.waiting += 1;
        while !state.open {
            self.cond.wait(&mut state);
        }
        state.waiting -= 1;
    }

    /// Block until the gate is open or `timeout` elapses
    ///
    /// Returns whether the gate was open when the call returned.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock();
        state.waiting += 1;
        while !state.open {
            if self.cond.wait_until(&mut state, deadline).timed_out() {
                break;
            }
        }
        state.waiting -= 1;
        state.open
    }

    /// Whether the gate has been opened
    pub fn is_open(&self) -> bool {
        self.state.lock().open
    }

    /// Number of threads currently blocked on the gate
    pub fn waiting(&self) -> usize {
        self.state.lock().waiting
    }
}
