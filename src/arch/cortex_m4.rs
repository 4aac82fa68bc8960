//! # Cortex-M4 Port Layer
//!
//! SysTick is the tick generator. It counts core clock cycles down from
//! `CYCLES_PER_TICK - 1` to zero, reloads, and raises its exception once per
//! millisecond. The exception handler's only job is to bump
//! [`SYSTEM_TICKS`].
//!
//! ## Microsecond Reads
//!
//! `now_us` combines the tick count with how far SysTick has counted into
//! the current tick:
//!
//! ```text
//!   CVR:  15999 ... 8000 ... 0 | reload | 15999 ...
//!         ^ tick n starts          ^ tick n+1 (COUNTFLAG, PENDSTSET)
//!
//!   us = n * 1000 + (15999 - CVR) * 1000 / 16000
//! ```
//!
//! Both values are sampled in one critical section. If SysTick reloaded
//! after the section was entered, its exception is pending but has not run
//! yet, so the tick count is one behind; the pending flag tells us to add it.

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::{SCB, SYST};
use cortex_m_rt::exception;

use crate::clock::Clock;
use crate::config::CYCLES_PER_TICK;
use crate::tick::{compose_us, SYSTEM_TICKS};
use crate::time::Timestamp;

// ---------------------------------------------------------------------------
// SysTick configuration
// ---------------------------------------------------------------------------

/// Configure SysTick to interrupt every millisecond from the core clock.
///
/// The reload value is exact (checked in `config`), so ticks do not drift
/// relative to the core clock.
pub fn configure_systick(syst: &mut SYST) {
    syst.disable_counter();
    syst.set_reload(CYCLES_PER_TICK - 1);
    syst.clear_current();
    syst.set_clock_source(SystClkSource::Core);
    syst.enable_interrupt();
    syst.enable_counter();
}

// ---------------------------------------------------------------------------
// SysTick handler
// ---------------------------------------------------------------------------

/// SysTick exception handler: one tick.
#[exception]
fn SysTick() {
    SYSTEM_TICKS.increment();
}

// ---------------------------------------------------------------------------
// Clock
// ---------------------------------------------------------------------------

/// The hardware monotonic clock.
///
/// Obtained from [`SysTickClock::start`], which takes the SysTick peripheral
/// so nothing else can reprogram it afterwards.
#[derive(Debug, Clone, Copy)]
pub struct SysTickClock {
    _private: (),
}

impl SysTickClock {
    /// Start the tick generator and return its clock.
    pub fn start(mut syst: SYST) -> Self {
        configure_systick(&mut syst);
        Self { _private: () }
    }

    /// The clock handle, for code running after [`SysTickClock::start`].
    ///
    /// Reading it before SysTick is started is harmless but the counter
    /// stays at zero.
    pub const fn handle() -> Self {
        Self { _private: () }
    }
}

impl Clock for SysTickClock {
    fn now_ms(&self) -> Timestamp {
        SYSTEM_TICKS.now()
    }

    fn now_us(&self) -> Timestamp {
        SYSTEM_TICKS.read_with(|ticks, _cs| {
            let mut current = SYST::get_current();
            let pending = SCB::is_pendst_pending();
            if pending {
                // Resample: the first read may predate the reload.
                current = SYST::get_current();
            }
            compose_us(ticks.raw(), current, pending)
        })
    }
}
