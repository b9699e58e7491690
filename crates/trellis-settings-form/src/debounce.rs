//! Trailing-edge debounce on top of the host's idle scheduler.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use trellis_core::{IdleOptions, IdleRequestId, IdleScheduler};

/// Keeps at most one pending idle request. Scheduling again cancels the
/// pending request, so only the last callback of a burst runs, no later
/// than `timeout` after it was scheduled.
pub struct Debouncer {
    scheduler: Rc<dyn IdleScheduler>,
    timeout: Duration,
    pending: Rc<Cell<Option<IdleRequestId>>>,
}

impl Debouncer {
    pub fn new(scheduler: Rc<dyn IdleScheduler>, timeout: Duration) -> Self {
        Self {
            scheduler,
            timeout,
            pending: Rc::new(Cell::new(None)),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn schedule(&self, callback: impl FnOnce() + 'static) {
        if let Some(previous) = self.pending.take() {
            log::debug!("superseding idle request {}", previous.raw());
            self.scheduler.cancel_idle(previous);
        }
        let slot = Rc::clone(&self.pending);
        let id = self.scheduler.request_idle(
            Box::new(move || {
                slot.set(None);
                callback();
            }),
            IdleOptions::with_timeout(self.timeout),
        );
        self.pending.set(Some(id));
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.pending.take() {
            self.scheduler.cancel_idle(pending);
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.get().is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("timeout", &self.timeout)
            .field("pending", &self.is_pending())
            .finish()
    }
}
