//! # Blocking Delay
//!
//! Busy-wait delays built only on a [`Clock`]. The tick interrupt keeps
//! running while the foreground spins, so the loop observes time passing.
//!
//! These occupy the CPU completely. Use them during initialization or in
//! code that does not care about timing; never from a dispatcher handler or
//! the superloop's steady state, where they would stall every other task.

use embedded_hal::delay::DelayNs;

use crate::clock::Clock;

/// Spin for at least `ms` milliseconds.
pub fn delay_ms<C: Clock + ?Sized>(clock: &C, ms: u32) {
    let start = clock.now_ms();
    while clock.now_ms().elapsed_since(start) < ms {
        core::hint::spin_loop();
    }
}

/// Spin for at least `us` microseconds.
///
/// Granularity is that of [`Clock::now_us`]; requests shorter than one clock
/// step may take a little longer than asked.
pub fn delay_us<C: Clock + ?Sized>(clock: &C, us: u32) {
    let start = clock.now_us();
    while clock.now_us().elapsed_since(start) < us {
        core::hint::spin_loop();
    }
}

/// Busy-wait delay provider over a [`Clock`], usable wherever an
/// embedded-hal driver wants a `DelayNs`.
#[derive(Debug, Clone, Copy)]
pub struct BusyDelay<C> {
    clock: C,
}

impl<C: Clock> BusyDelay<C> {
    /// Wrap `clock`.
    pub const fn new(clock: C) -> Self {
        Self { clock }
    }

    /// The clock being spun on.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Give the clock back.
    pub fn into_inner(self) -> C {
        self.clock
    }
}

impl<C: Clock> DelayNs for BusyDelay<C> {
    fn delay_ns(&mut self, ns: u32) {
        delay_us(&self.clock, ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        delay_us(&self.clock, us);
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_ms(&self.clock, ms);
    }
}
