//! Platform abstraction traits for host scheduling services.
//!
//! These traits let the settings panel defer work to the host's idle time
//! and read time without depending on a particular event loop.

use std::time::Duration;

/// Provides timing information for idle scheduling.
pub trait Clock {
    /// Instant type produced by this clock implementation.
    type Instant: Copy;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// Wall clock backed by `web_time::Instant` so wasm hosts share the code path.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> Self::Instant {
        web_time::Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        u64::try_from(since.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Handle returned by [`IdleScheduler::request_idle`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdleRequestId(pub(crate) u64);

impl IdleRequestId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IdleOptions {
    /// Upper bound on how long the callback may wait for idle time.
    pub timeout: Duration,
}

impl IdleOptions {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

/// Defers callbacks until the host has no higher-priority work, bounded by
/// [`IdleOptions::timeout`].
pub trait IdleScheduler {
    fn request_idle(&self, callback: Box<dyn FnOnce() + 'static>, options: IdleOptions) -> IdleRequestId;

    /// Cancelling an unknown or already-fired request is a no-op.
    fn cancel_idle(&self, id: IdleRequestId);
}
