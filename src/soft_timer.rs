//! # Software Timer
//!
//! A reusable interval anchored at a start time. Owned by value by whoever
//! needs it, typically one per use-site, and never touched from interrupt
//! context, so it needs no locking.
//!
//! Two ways to check it:
//!
//! - [`SoftTimer::is_elapsed`] only looks. Use it for one-shot timeouts.
//! - [`SoftTimer::is_elapsed_and_reset`] realigns the anchor to the most
//!   recent interval boundary when it fires. A caller polling late, or after
//!   several periods were missed, gets one `true` and keeps its phase:
//!
//! ```text
//!  interval = 100
//!  start    0         100       200       300
//!           |---------|---------|---------|----
//!  poll              150 -> fire, start = 100
//!                                        340 -> fire, start = 300
//! ```
//!
//! Each operation has an `_at(now)` form for callers that already hold a
//! timestamp.

use crate::clock::Clock;
use crate::time::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SoftTimer {
    start: Timestamp,
    interval: u32,
}

impl SoftTimer {
    /// A zeroed timer. Call [`SoftTimer::start`] before checking it.
    pub const fn new() -> Self {
        Self {
            start: Timestamp::ZERO,
            interval: 0,
        }
    }

    /// Arm with `interval_ms`, anchored at the current time.
    pub fn start<C: Clock + ?Sized>(&mut self, clock: &C, interval_ms: u32) {
        self.start_at(clock.now_ms(), interval_ms);
    }

    /// [`SoftTimer::start`] anchored at `now`.
    pub fn start_at(&mut self, now: Timestamp, interval_ms: u32) {
        self.interval = interval_ms;
        self.start = now;
    }

    /// Re-anchor at the current time, keeping the interval.
    pub fn restart<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.restart_at(clock.now_ms());
    }

    /// [`SoftTimer::restart`] anchored at `now`.
    pub fn restart_at(&mut self, now: Timestamp) {
        self.start = now;
    }

    /// Whether the interval has passed. Does not modify the timer.
    ///
    /// With an interval of 0 this is always true.
    pub fn is_elapsed<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        self.is_elapsed_at(clock.now_ms())
    }

    /// [`SoftTimer::is_elapsed`] evaluated at `now`.
    pub fn is_elapsed_at(&self, now: Timestamp) -> bool {
        now.elapsed_since(self.start) >= self.interval
    }

    /// Whether the interval has passed; if so, move the anchor forward by
    /// whole intervals to the latest boundary not after `now`.
    ///
    /// An interval of 0 always fires and re-anchors at `now`.
    pub fn is_elapsed_and_reset<C: Clock + ?Sized>(&mut self, clock: &C) -> bool {
        self.is_elapsed_and_reset_at(clock.now_ms())
    }

    /// [`SoftTimer::is_elapsed_and_reset`] evaluated at `now`.
    pub fn is_elapsed_and_reset_at(&mut self, now: Timestamp) -> bool {
        let elapsed = now.elapsed_since(self.start);
        if elapsed < self.interval {
            return false;
        }

        if self.interval > 0 {
            // elapsed - elapsed % interval == interval * floor(elapsed / interval)
            self.start = self.start.wrapping_add(elapsed - elapsed % self.interval);
        } else {
            self.start = now;
        }
        true
    }

    /// Milliseconds until the next expiry, 0 if already elapsed.
    pub fn remaining<C: Clock + ?Sized>(&self, clock: &C) -> u32 {
        self.remaining_at(clock.now_ms())
    }

    /// [`SoftTimer::remaining`] evaluated at `now`.
    pub fn remaining_at(&self, now: Timestamp) -> u32 {
        self.interval.saturating_sub(now.elapsed_since(self.start))
    }

    /// Interval in milliseconds, 0 if never started.
    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// The current anchor.
    pub fn start_time(&self) -> Timestamp {
        self.start
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for SoftTimer {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "SoftTimer(start={}, interval={}ms)", self.start, self.interval);
    }
}
