//! Time sources and the batch refresh cadence.
//!
//! The monitor never reads the wall clock directly. It asks a `Clock` for a
//! monotonic reading and a `RefreshSchedule` decides whether a new detection
//! batch is due, so tests can drive cycles deterministically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Default interval between detection batches.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(2);

/// Monotonic time source.
pub trait Clock {
    /// Time elapsed since the clock was created.
    fn now(&self) -> Duration;

    fn now_ms(&self) -> u64 {
        self.now().as_millis() as u64
    }
}

/// Wall-clock backed monotonic clock.
#[derive(Clone, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Manually advanced clock. Clones share the same reading.
#[derive(Clone, Debug, Default)]
pub struct ManualClock {
    elapsed_ms: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.elapsed_ms
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, at: Duration) {
        self.elapsed_ms
            .store(at.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
    }
}

/// Fixed-cadence refresh with immediate re-arm on input changes.
#[derive(Clone, Debug)]
pub struct RefreshSchedule {
    interval: Duration,
    next_due: Option<Duration>,
}

impl RefreshSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when a refresh should run at `now`. A fresh schedule is always due.
    pub fn is_due(&self, now: Duration) -> bool {
        self.next_due.map_or(true, |due| now >= due)
    }

    /// Record a refresh at `now` and arm the next one.
    pub fn mark(&mut self, now: Duration) {
        self.next_due = Some(now + self.interval);
    }

    /// Make the next refresh due immediately.
    pub fn reset(&mut self) {
        self.next_due = None;
    }

    /// Time remaining until the next refresh.
    pub fn until_due(&self, now: Duration) -> Duration {
        self.next_due
            .map(|due| due.saturating_sub(now))
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for RefreshSchedule {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}
