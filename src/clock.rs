//! # Monotonic Clock
//!
//! [`Clock`] is the seam between the timebase and everything built on it.
//! Delays, software timers, the timeout helpers and the dispatcher are all
//! generic over it, so the same code runs against the SysTick port on the
//! target and against [`ManualClock`] in host tests and simulations.

use core::cell::Cell;

use crate::time::Timestamp;

/// Source of monotonic timestamps.
///
/// Two reads on the same thread of control never go backward, except across
/// the 2^32 wraparound, which wrapping arithmetic absorbs.
pub trait Clock {
    /// Milliseconds since the timebase started, wrapping.
    fn now_ms(&self) -> Timestamp;

    /// Microseconds since the timebase started, wrapping (about every 71
    /// minutes). Resolution depends on the implementation.
    fn now_us(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }

    fn now_us(&self) -> Timestamp {
        (**self).now_us()
    }
}

/// Software-driven clock for tests and host simulation.
///
/// Time only moves when told to: explicitly through the `advance_*` methods,
/// or by a fixed step after every read when built with
/// [`ManualClock::with_auto_advance`]. The latter lets busy-wait loops make
/// progress without a tick interrupt.
#[derive(Debug, Default)]
pub struct ManualClock {
    micros: Cell<u64>,
    step_us: u32,
}

impl ManualClock {
    /// A clock at time zero.
    pub const fn new() -> Self {
        Self {
            micros: Cell::new(0),
            step_us: 0,
        }
    }

    /// A clock whose millisecond reading starts at `ms`.
    pub const fn starting_at_ms(ms: u32) -> Self {
        Self {
            micros: Cell::new(ms as u64 * 1000),
            step_us: 0,
        }
    }

    /// Advance by `step_us` microseconds after every read.
    pub const fn with_auto_advance(mut self, step_us: u32) -> Self {
        self.step_us = step_us;
        self
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance_ms(&self, ms: u32) {
        self.advance_us(ms as u64 * 1000);
    }

    /// Move time forward by `us` microseconds.
    pub fn advance_us(&self, us: u64) {
        self.micros.set(self.micros.get().wrapping_add(us));
    }

    /// Jump to the start of millisecond `ms`. May move time backward, which a
    /// real clock never does; only use it to set up a scenario.
    pub fn set_ms(&self, ms: u32) {
        self.micros.set(ms as u64 * 1000);
    }

    fn read(&self) -> u64 {
        let now = self.micros.get();
        if self.step_us != 0 {
            self.micros.set(now.wrapping_add(self.step_us as u64));
        }
        now
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Timestamp {
        Timestamp::from_raw((self.read() / 1000) as u32)
    }

    fn now_us(&self) -> Timestamp {
        Timestamp::from_raw(self.read() as u32)
    }
}
