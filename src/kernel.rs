//! # Kernel
//!
//! Startup and the global timebase API for firmware.
//!
//! ## Startup Sequence
//!
//! ```text
//! reset_handler (cortex-m-rt)
//!   └─► main()
//!         ├─► board pins and UART
//!         ├─► kernel::init()          ← SysTick at 1 kHz
//!         ├─► Dispatcher::register_task() (×N)
//!         └─► Dispatcher::run_forever()  (no return)
//! ```
//!
//! After `init`, the free functions here read the system clock directly, so
//! code that has no clock handle at hand (task handlers are plain `fn()`)
//! can still tell time.

use cortex_m::peripheral::SYST;
use log::info;

use crate::arch::cortex_m4::SysTickClock;
use crate::clock::Clock;
use crate::config::{CYCLES_PER_TICK, SYSTEM_CLOCK_HZ, TICK_HZ};
use crate::delay;
use crate::time::{self, Timestamp};

/// Start the tick generator. Call once during initialization.
pub fn init(syst: SYST) -> SysTickClock {
    let clock = SysTickClock::start(syst);
    info!(
        "timebase: {} Hz tick from {} Hz core ({} cycles/tick)",
        TICK_HZ, SYSTEM_CLOCK_HZ, CYCLES_PER_TICK
    );
    clock
}

/// Milliseconds since `init`, wrapping after about 49.7 days.
#[inline]
pub fn now_ms() -> Timestamp {
    SysTickClock::handle().now_ms()
}

/// Microseconds since `init`, wrapping after about 71.6 minutes.
#[inline]
pub fn now_us() -> Timestamp {
    SysTickClock::handle().now_us()
}

/// Busy-wait. Not for use inside dispatcher handlers.
pub fn delay_ms(ms: u32) {
    delay::delay_ms(&SysTickClock::handle(), ms);
}

/// Busy-wait. Not for use inside dispatcher handlers.
pub fn delay_us(us: u32) {
    delay::delay_us(&SysTickClock::handle(), us);
}

/// Milliseconds since `start` on the system clock.
pub fn elapsed_since(start: Timestamp) -> u32 {
    time::elapsed_since(&SysTickClock::handle(), start)
}

/// True once `timeout_ms` has passed since `start` on the system clock.
pub fn is_timeout(start: Timestamp, timeout_ms: u32) -> bool {
    time::is_timeout(&SysTickClock::handle(), start, timeout_ms)
}
