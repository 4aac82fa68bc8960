//! # Tickloop Configuration
//!
//! Compile-time constants for the timebase and the dispatcher.
//! A bad combination is rejected by the assertions at the bottom of this
//! file, so it never surfaces as a runtime error.

/// Tick interrupt frequency in Hz. One tick is one millisecond.
pub const TICK_HZ: u32 = 1000;

/// Core clock driving SysTick (STM32F4 16 MHz HSI after reset).
pub const SYSTEM_CLOCK_HZ: u32 = 16_000_000;

/// Core clock cycles between two tick interrupts.
pub const CYCLES_PER_TICK: u32 = SYSTEM_CLOCK_HZ / TICK_HZ;

/// Microseconds per tick.
pub const US_PER_TICK: u32 = 1_000_000 / TICK_HZ;

/// Capacity of the firmware's task table.
pub const MAX_TASKS: usize = 8;

/// Baud rate of the diagnostic UART (8N1, TX only).
pub const UART_BAUD: u32 = 38_400;

/// Largest value the SysTick reload register holds (24 bits).
pub const SYST_RELOAD_MAX: u32 = 0x00FF_FFFF;

// The millisecond timebase relies on both of these holding exactly.
const _: () = assert!(TICK_HZ == 1000, "timestamps are milliseconds");
const _: () = assert!(
    SYSTEM_CLOCK_HZ % TICK_HZ == 0,
    "core clock must divide evenly into ticks"
);
const _: () = assert!(
    CYCLES_PER_TICK >= 1 && CYCLES_PER_TICK - 1 <= SYST_RELOAD_MAX,
    "tick period does not fit the SysTick reload register"
);
const _: () = assert!(MAX_TASKS > 0);
