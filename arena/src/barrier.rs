//! The starting gun.
//!
//! Workers register and then sleep until the orchestrator fires; the orchestrator later
//! sleeps until every worker has reported done. One lock, one condition, two counters.
//! Nothing here polls.

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

#[derive(Debug, Default)]
struct Gate {
    registered: usize,
    running: usize,
    released: bool,
}

#[derive(Debug, Default)]
pub struct StartBarrier {
    gate: Mutex<Gate>,
    changed: Condvar,
}

impl StartBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the caller in, both as registered and as running.
    pub fn register(&self) {
        let mut gate = self.gate.lock();
        if gate.released {
            warn!(registered = gate.registered, "registration after the barrier was released");
        }
        gate.registered += 1;
        gate.running += 1;
        // The orchestrator may be waiting on the registration count.
        self.changed.notify_all();
    }

    /// Blocks until [`StartBarrier::release_all`] has been called.
    ///
    /// The released flag is checked under the same lock `release_all` sets it under, so a
    /// release that happens before this call is never missed.
    pub fn wait_for_release(&self) {
        let mut gate = self.gate.lock();
        while !gate.released {
            self.changed.wait(&mut gate);
        }
    }

    /// Blocks the orchestrator until at least `expected` workers have registered.
    pub fn wait_for_registrations(&self, expected: usize) {
        let mut gate = self.gate.lock();
        while gate.registered < expected {
            self.changed.wait(&mut gate);
        }
    }

    /// Fires the gun. Returns false if it had already been fired.
    pub fn release_all(&self) -> bool {
        let mut gate = self.gate.lock();
        if gate.released {
            return false;
        }
        gate.released = true;
        debug!(registered = gate.registered, "releasing players");
        self.changed.notify_all();
        true
    }

    /// Counts the caller out. The last one out wakes the orchestrator.
    pub fn mark_done(&self) {
        let mut gate = self.gate.lock();
        debug_assert!(gate.running > 0, "mark_done without register");
        gate.running = gate.running.saturating_sub(1);
        if gate.running == 0 {
            self.changed.notify_all();
        }
    }

    /// Blocks until every registered worker has called [`StartBarrier::mark_done`].
    pub fn wait_for_completion(&self) {
        let mut gate = self.gate.lock();
        while gate.running > 0 {
            self.changed.wait(&mut gate);
        }
    }

    #[cfg(test)]
    fn is_released(&self) -> bool {
        self.gate.lock().released
    }

    #[cfg(test)]
    fn registered(&self) -> usize {
        self.gate.lock().registered
    }

    #[cfg(test)]
    fn running(&self) -> usize {
        self.gate.lock().running
    }
}
