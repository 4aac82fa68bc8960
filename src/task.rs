//! # Task Descriptor
//!
//! One entry of the dispatcher's table: a handler, its period, and the
//! timestamp of its last run. Descriptors are plain foreground data; the
//! tick interrupt never touches them.

use crate::time::Timestamp;

/// A periodic task body. Runs to completion and must not block; a handler
/// that never returns halts every other task.
pub type Handler = fn();

/// Index-based handle to a registered task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) usize);

impl TaskId {
    /// Handle for the task at `index`. Lookups with an index past the end of
    /// the table return `None`.
    pub const fn from_index(index: usize) -> Self {
        Self(index)
    }

    /// Position in the task table, which is also the polling order.
    pub const fn index(self) -> usize {
        self.0
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TaskId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "task#{}", self.0);
    }
}

/// Task descriptor.
#[derive(Debug, Clone, Copy)]
pub struct Task {
    /// Body invoked each time the period has elapsed.
    pub handler: Handler,

    /// Period in milliseconds. `0` runs the task on every pass.
    pub period_ms: u32,

    /// Timestamp sampled at the start of the pass in which the task last ran.
    pub last_run: Timestamp,

    /// Number of times the handler has run, wrapping.
    pub runs: u32,
}

impl Task {
    /// A task that has never run. `last_run` starts at zero, so the first
    /// run happens on the first pass at or after `period_ms`.
    pub const fn new(handler: Handler, period_ms: u32) -> Self {
        Self {
            handler,
            period_ms,
            last_run: Timestamp::ZERO,
            runs: 0,
        }
    }

    /// Whether the period has elapsed as of `now`.
    #[inline]
    pub fn is_due(&self, now: Timestamp) -> bool {
        now.elapsed_since(self.last_run) >= self.period_ms
    }

    /// Run the handler if due, resetting `last_run` to `now`.
    ///
    /// Returns whether the handler ran.
    pub fn poll(&mut self, now: Timestamp) -> bool {
        if !self.is_due(now) {
            return false;
        }
        self.last_run = now;
        self.runs = self.runs.wrapping_add(1);
        (self.handler)();
        true
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU32, Ordering};

    fn noop() {}

    #[test]
    fn test_new_task() {
        let task = Task::new(noop, 50);
        assert_eq!(task.period_ms, 50);
        assert_eq!(task.last_run, Timestamp::ZERO);
        assert_eq!(task.runs, 0);
    }

    #[test]
    fn test_due_at_period() {
        let task = Task::new(noop, 50);
        assert!(!task.is_due(Timestamp::from_raw(49)));
        assert!(task.is_due(Timestamp::from_raw(50)));
    }

    #[test]
    fn test_poll_resets_to_now() {
        static CALLS: AtomicU32 = AtomicU32::new(0);
        fn count() {
            CALLS.fetch_add(1, Ordering::Relaxed);
        }

        let mut task = Task::new(count, 100);
        assert!(!task.poll(Timestamp::from_raw(99)));
        assert_eq!(CALLS.load(Ordering::Relaxed), 0);

        // Late by 30ms: the next period is measured from 130, not 100.
        assert!(task.poll(Timestamp::from_raw(130)));
        assert_eq!(task.last_run.raw(), 130);
        assert_eq!(task.runs, 1);

        assert!(!task.poll(Timestamp::from_raw(229)));
        assert!(task.poll(Timestamp::from_raw(230)));
        assert_eq!(CALLS.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn test_zero_period_always_due() {
        let mut task = Task::new(noop, 0);
        for now in [0, 0, 1, 7] {
            assert!(task.poll(Timestamp::from_raw(now)));
        }
        assert_eq!(task.runs, 4);
    }

    #[test]
    fn test_due_across_wraparound() {
        let mut task = Task::new(noop, 10);
        task.last_run = Timestamp::from_raw(u32::MAX - 4);
        assert!(!task.is_due(Timestamp::from_raw(4)));
        assert!(task.is_due(Timestamp::from_raw(5)));
    }
}
