use crate::platform::{Clock, IdleOptions, IdleRequestId, IdleScheduler};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

struct IdleEntry<I> {
    id: IdleRequestId,
    requested_at: I,
    timeout_millis: u64,
    callback: Box<dyn FnOnce() + 'static>,
}

/// Queue-backed [`IdleScheduler`] driven by the host event loop.
///
/// The host calls [`IdleQueue::run_idle`] when it has spare time and
/// [`IdleQueue::run_expired`] once per tick so that requests whose timeout
/// elapsed run even while the host stays busy.
pub struct IdleQueue<C: Clock> {
    clock: C,
    entries: RefCell<VecDeque<IdleEntry<C::Instant>>>,
    next_id: Cell<u64>,
}

impl<C: Clock> IdleQueue<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            entries: RefCell::new(VecDeque::new()),
            next_id: Cell::new(1),
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Number of requests that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Runs every pending request. Returns how many callbacks ran.
    pub fn run_idle(&self) -> usize {
        let drained: Vec<_> = self.entries.borrow_mut().drain(..).collect();
        Self::run_entries(drained)
    }

    /// Runs only the requests whose timeout has elapsed.
    pub fn run_expired(&self) -> usize {
        let expired: Vec<_> = {
            let mut entries = self.entries.borrow_mut();
            let (expired, waiting): (Vec<_>, Vec<_>) = entries.drain(..).partition(|entry| {
                self.clock.elapsed_millis(entry.requested_at) >= entry.timeout_millis
            });
            entries.extend(waiting);
            expired
        };
        Self::run_entries(expired)
    }

    // Callbacks run with the queue unborrowed so they may request more idle work.
    fn run_entries(entries: Vec<IdleEntry<C::Instant>>) -> usize {
        let count = entries.len();
        for entry in entries {
            log::trace!("running idle request {}", entry.id.raw());
            (entry.callback)();
        }
        count
    }
}

impl<C: Clock> IdleScheduler for IdleQueue<C> {
    fn request_idle(&self, callback: Box<dyn FnOnce() + 'static>, options: IdleOptions) -> IdleRequestId {
        let id = IdleRequestId(self.next_id.get());
        self.next_id.set(id.0.wrapping_add(1));
        self.entries.borrow_mut().push_back(IdleEntry {
            id,
            requested_at: self.clock.now(),
            timeout_millis: u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
            callback,
        });
        id
    }

    fn cancel_idle(&self, id: IdleRequestId) {
        self.entries.borrow_mut().retain(|entry| entry.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use std::time::Duration;

    #[derive(Clone, Default)]
    struct StepClock(Rc<Cell<u64>>);

    impl Clock for StepClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            self.0.get()
        }

        fn elapsed_millis(&self, since: u64) -> u64 {
            self.0.get().saturating_sub(since)
        }
    }

    fn counter() -> (Rc<Cell<u32>>, impl Fn() -> Box<dyn FnOnce()>) {
        let count = Rc::new(Cell::new(0));
        let make = {
            let count = Rc::clone(&count);
            move || -> Box<dyn FnOnce()> {
                let count = Rc::clone(&count);
                Box::new(move || count.set(count.get() + 1))
            }
        };
        (count, make)
    }

    #[test]
    fn cancelled_requests_never_run() {
        let queue = IdleQueue::new(StepClock::default());
        let (count, make) = counter();
        let first = queue.request_idle(make(), IdleOptions::with_timeout(Duration::from_millis(10)));
        queue.request_idle(make(), IdleOptions::with_timeout(Duration::from_millis(10)));
        queue.cancel_idle(first);

        assert_eq!(queue.run_idle(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn run_expired_respects_timeouts() {
        let clock = StepClock::default();
        let queue = IdleQueue::new(clock.clone());
        let (count, make) = counter();
        queue.request_idle(make(), IdleOptions::with_timeout(Duration::from_millis(100)));
        queue.request_idle(make(), IdleOptions::with_timeout(Duration::from_millis(500)));

        clock.0.set(100);
        assert_eq!(queue.run_expired(), 1);
        assert_eq!(count.get(), 1);
        assert_eq!(queue.pending(), 1);

        clock.0.set(499);
        assert_eq!(queue.run_expired(), 0);
        clock.0.set(500);
        assert_eq!(queue.run_expired(), 1);
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn oversized_timeouts_saturate() {
        let clock = StepClock::default();
        let queue = IdleQueue::new(clock.clone());
        let (count, make) = counter();
        // 2^64 ms would wrap to zero if narrowed.
        let timeout = Duration::from_millis(u64::MAX) + Duration::from_millis(1);
        queue.request_idle(make(), IdleOptions::with_timeout(timeout));

        clock.0.set(1 << 40);
        assert_eq!(queue.run_expired(), 0);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_idle(), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn callbacks_may_request_more_idle_work() {
        let queue = Rc::new(IdleQueue::new(StepClock::default()));
        let (count, make) = counter();
        let inner = make();
        let requeue = {
            let queue = Rc::clone(&queue);
            Box::new(move || {
                queue.request_idle(inner, IdleOptions::with_timeout(Duration::ZERO));
            })
        };
        queue.request_idle(requeue, IdleOptions::with_timeout(Duration::ZERO));

        assert_eq!(queue.run_idle(), 1);
        assert_eq!(queue.pending(), 1);
        assert_eq!(queue.run_idle(), 1);
        assert_eq!(count.get(), 1);
    }
}
