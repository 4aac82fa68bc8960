//! Timestamps and the stateless elapsed/timeout helpers.
//!
//! A [`Timestamp`] is a 32-bit snapshot of the tick counter (milliseconds) or
//! of the derived microsecond count. Durations are plain `u32` counts in the
//! same unit. All arithmetic wraps: `now - start` computed modulo 2^32 is the
//! correct forward distance as long as less than 2^32 units have passed,
//! including across the counter's wraparound (about 49.7 days for ms).

use core::fmt;

use crate::clock::Clock;

/// A point in time as read from a [`Clock`].
///
/// Deliberately not `Ord`: after a wraparound a later timestamp can hold a
/// smaller raw value. Compare through [`Timestamp::elapsed_since`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timestamp(u32);

impl Timestamp {
    /// The counter value at reset.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw counter value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Forward distance from `earlier` to `self`, modulo 2^32.
    #[inline]
    pub const fn elapsed_since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    /// `self` moved forward by `units`, wrapping.
    #[inline]
    pub const fn wrapping_add(self, units: u32) -> Self {
        Self(self.0.wrapping_add(units))
    }
}

impl From<Timestamp> for u32 {
    fn from(t: Timestamp) -> Self {
        t.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t:{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Timestamp {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "t:{}", self.0);
    }
}

/// Milliseconds elapsed since `start`.
#[inline]
pub fn elapsed_since<C: Clock + ?Sized>(clock: &C, start: Timestamp) -> u32 {
    clock.now_ms().elapsed_since(start)
}

/// True once at least `timeout_ms` milliseconds have passed since `start`.
#[inline]
pub fn is_timeout<C: Clock + ?Sized>(clock: &C, start: Timestamp, timeout_ms: u32) -> bool {
    elapsed_since(clock, start) >= timeout_ms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_elapsed_plain() {
        let start = Timestamp::from_raw(1_000);
        assert_eq!(Timestamp::from_raw(1_250).elapsed_since(start), 250);
        assert_eq!(start.elapsed_since(start), 0);
    }

    #[test]
    fn test_elapsed_across_wraparound() {
        let cases: [(u32, u32); 4] = [
            (u32::MAX, 1),
            (u32::MAX - 9, 10),
            (u32::MAX - 499, 1_000),
            (0x8000_0000, u32::MAX),
        ];

        for (start, distance) in cases {
            let a = Timestamp::from_raw(start);
            let b = a.wrapping_add(distance);
            assert_eq!(b.elapsed_since(a), distance, "start={start} distance={distance}");
        }
    }

    #[test]
    fn test_elapsed_since_reads_clock() {
        let clock = ManualClock::starting_at_ms(u32::MAX - 4);
        let start = clock.now_ms();
        clock.advance_ms(12);

        assert_eq!(clock.now_ms().raw(), 7);
        assert_eq!(elapsed_since(&clock, start), 12);
    }

    #[test]
    fn test_timeout_transitions_once() {
        let clock = ManualClock::starting_at_ms(u32::MAX - 20);
        let start = clock.now_ms();
        let mut transitions = 0;
        let mut previous = is_timeout(&clock, start, 50);
        assert!(!previous);

        for elapsed in 1..=100u32 {
            clock.advance_ms(1);
            let now = is_timeout(&clock, start, 50);
            assert_eq!(now, elapsed >= 50, "elapsed={elapsed}");
            if now != previous {
                transitions += 1;
            }
            previous = now;
        }

        assert_eq!(transitions, 1);
    }

    #[test]
    fn test_zero_timeout_is_immediate() {
        let clock = ManualClock::new();
        assert!(is_timeout(&clock, clock.now_ms(), 0));
    }
}
