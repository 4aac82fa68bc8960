//! # Tick Counter
//!
//! The process-wide millisecond counter. It has exactly one writer, the tick
//! interrupt, which calls [`TickCounter::increment`] once per period. Every
//! other access is a snapshot taken inside a critical section, so the
//! foreground never sees a half-updated value even on cores whose 32-bit
//! loads are not atomic.
//!
//! ```text
//!   SysTick exception ──increment()──► SYSTEM_TICKS ◄──now()── superloop
//!                                         (Mutex<Cell<u32>>)
//! ```

use core::cell::Cell;

use crate::clock::Clock;
use crate::config::{CYCLES_PER_TICK, US_PER_TICK};
use crate::sync::{self, CriticalSection, Mutex};
use crate::time::Timestamp;

/// Single-writer, multi-reader wrapping tick counter.
pub struct TickCounter {
    ticks: Mutex<Cell<u32>>,
}

impl TickCounter {
    /// A counter at zero, the state at reset.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// A counter preset to `ticks`. Used to exercise wraparound.
    pub const fn starting_at(ticks: u32) -> Self {
        Self {
            ticks: Mutex::new(Cell::new(ticks)),
        }
    }

    /// Advance by one tick, wrapping at 2^32.
    ///
    /// Interrupt context only. The tick interrupt is the sole writer and
    /// nothing else may call this.
    #[inline]
    pub fn increment(&self) {
        sync::critical_section(|cs| {
            let ticks = self.ticks.borrow(cs);
            ticks.set(ticks.get().wrapping_add(1));
        });
    }

    /// Snapshot of the counter.
    #[inline]
    pub fn now(&self) -> Timestamp {
        sync::critical_section(|cs| Timestamp::from_raw(self.ticks.borrow(cs).get()))
    }

    /// Snapshot the counter and run `f` inside the same critical section.
    ///
    /// Lets a clock sample a peripheral register consistently with the tick
    /// count it belongs to.
    #[inline]
    pub fn read_with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(Timestamp, CriticalSection<'_>) -> R,
    {
        sync::critical_section(|cs| f(Timestamp::from_raw(self.ticks.borrow(cs).get()), cs))
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Tick-resolution clock. `now_us` has one-tick granularity; the hardware
/// port refines it with the live timer register.
impl Clock for TickCounter {
    fn now_ms(&self) -> Timestamp {
        self.now()
    }

    fn now_us(&self) -> Timestamp {
        compose_us(self.now().raw(), CYCLES_PER_TICK - 1, false)
    }
}

/// Microsecond reading from a tick count and the tick timer's down-counter.
///
/// `current` counts from `CYCLES_PER_TICK - 1` at the start of a tick down
/// to 0 at its end. `pending` means the timer has reloaded but the tick
/// interrupt has not run yet, so `ticks` is one behind; `current` must then
/// be sampled after the reload was seen.
pub fn compose_us(ticks: u32, current: u32, pending: bool) -> Timestamp {
    let ticks = if pending { ticks.wrapping_add(1) } else { ticks };
    let counted = (CYCLES_PER_TICK - 1).saturating_sub(current) as u64;
    let sub_us = (counted * US_PER_TICK as u64 / CYCLES_PER_TICK as u64) as u32;
    Timestamp::from_raw(ticks.wrapping_mul(US_PER_TICK).wrapping_add(sub_us))
}

/// The system tick counter, advanced by the tick interrupt.
pub static SYSTEM_TICKS: TickCounter = TickCounter::new();
