//! # Synchronization Primitives
//!
//! Interrupt-safe critical sections. The tick counter is the only state
//! shared between the tick interrupt and the superloop, and every foreground
//! read of it goes through [`critical_section`].
//!
//! On Cortex-M the implementation comes from `cortex-m`'s
//! `critical-section-single-core` feature: PRIMASK is saved on entry and
//! restored on exit, so a nested section never re-enables interrupts that
//! were already off. Host builds use the `std` implementation.

pub use critical_section::{CriticalSection, Mutex};

/// Execute a closure within a critical section (interrupts disabled).
///
/// Keep the body to a few loads and stores; the tick interrupt is held off
/// for its whole duration.
#[inline]
pub fn critical_section<F, R>(f: F) -> R
where
    F: FnOnce(CriticalSection<'_>) -> R,
{
    critical_section::with(f)
}
