//! # Tickloop
//!
//! A millisecond timebase and a cooperative periodic task dispatcher for
//! single-core microcontrollers without an operating system.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                 Application superloop                   │
//! │        Dispatcher::run_forever() · task handlers        │
//! ├──────────────┬──────────────┬──────────────┬───────────┤
//! │  Dispatcher  │  SoftTimer   │  delay_ms/us │ elapsed / │
//! │ dispatcher.rs│ soft_timer.rs│  delay.rs    │ is_timeout│
//! ├──────────────┴──────────────┴──────────────┴───────────┤
//! │            Clock trait (clock.rs, time.rs)              │
//! │              now_ms() · now_us() · Timestamp            │
//! ├────────────────────────────────────────────────────────┤
//! │     Tick Counter (tick.rs) · critical sections (sync)   │
//! ├────────────────────────────────────────────────────────┤
//! │     Arch Port (arch/cortex_m4.rs): SysTick @ 1 kHz      │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Data flows one way: the tick interrupt increments the counter, the clock
//! reads it, and everything else asks the clock.
//!
//! ## Time Arithmetic
//!
//! Timestamps are 32-bit and wrap (every ~49.7 days in milliseconds). All
//! elapsed computations are `now.wrapping_sub(start)`, which is correct
//! across the wrap as long as the interval itself is shorter than 2^32.
//!
//! ## Two Periodic Policies
//!
//! - [`SoftTimer::is_elapsed_and_reset`] realigns to the interval grid and
//!   never drifts; after missed periods it fires once and catches up.
//! - [`Dispatcher`] resets each task's `last_run` to the time of the pass
//!   that ran it, so a late pass shifts the task's schedule.
//!
//! ## Memory Model
//!
//! - **No heap**: fixed-capacity `heapless` storage only
//! - **One shared variable**: the tick counter, read in critical sections
//! - **Everything else is foreground-only** and owned by value
//!
//! ## Host Builds
//!
//! Everything except `arch`, `board` and `kernel` is target-independent and
//! is tested on the host against [`ManualClock`] and [`TickCounter`].

#![no_std]

pub mod clock;
pub mod config;
pub mod delay;
pub mod dispatcher;
pub mod error;
pub mod hal;
pub mod logger;
pub mod soft_timer;
pub mod sync;
pub mod task;
pub mod tick;
pub mod time;

#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod arch;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod board;
#[cfg(all(target_arch = "arm", target_os = "none"))]
pub mod kernel;

pub use clock::{Clock, ManualClock};
pub use delay::BusyDelay;
pub use dispatcher::Dispatcher;
pub use error::{Error, Result};
pub use soft_timer::SoftTimer;
pub use task::{Handler, Task, TaskId};
pub use tick::{TickCounter, SYSTEM_TICKS};
pub use time::{elapsed_since, is_timeout, Timestamp};
