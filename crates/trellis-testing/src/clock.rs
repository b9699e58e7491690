use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use trellis_core::{Clock, IdleOptions, IdleQueue, IdleRequestId, IdleScheduler};

/// Clock that only moves when told to.
#[derive(Clone, Default)]
pub struct ManualClock {
    millis: Rc<Cell<u64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis.set(self.millis.get() + by.as_millis() as u64);
    }

    pub fn now_millis(&self) -> u64 {
        self.millis.get()
    }
}

impl Clock for ManualClock {
    type Instant = u64;

    fn now(&self) -> u64 {
        self.millis.get()
    }

    fn elapsed_millis(&self, since: u64) -> u64 {
        self.millis.get().saturating_sub(since)
    }
}

/// Idle scheduler on virtual time. Nothing runs until the test either
/// declares the host idle or advances the clock past a timeout.
pub struct ManualIdleScheduler {
    clock: ManualClock,
    queue: IdleQueue<ManualClock>,
    requests: Cell<usize>,
    cancellations: Cell<usize>,
}

impl Default for ManualIdleScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualIdleScheduler {
    pub fn new() -> Self {
        let clock = ManualClock::new();
        Self {
            queue: IdleQueue::new(clock.clone()),
            clock,
            requests: Cell::new(0),
            cancellations: Cell::new(0),
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    /// Runs everything still pending, as if the host just went idle.
    pub fn run_idle(&self) -> usize {
        self.queue.run_idle()
    }

    /// Advances virtual time and runs requests whose timeout elapsed.
    pub fn advance(&self, by: Duration) -> usize {
        self.clock.advance(by);
        self.queue.run_expired()
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations.get()
    }
}

impl IdleScheduler for ManualIdleScheduler {
    fn request_idle(&self, callback: Box<dyn FnOnce() + 'static>, options: IdleOptions) -> IdleRequestId {
        self.requests.set(self.requests.get() + 1);
        self.queue.request_idle(callback, options)
    }

    fn cancel_idle(&self, id: IdleRequestId) {
        self.cancellations.set(self.cancellations.get() + 1);
        self.queue.cancel_idle(id);
    }
}
