//! # Task Dispatcher
//!
//! Cooperative, table-driven periodic dispatcher for a single superloop.
//!
//! ## Dispatch Algorithm
//!
//! Each call to [`Dispatcher::run_pending_tasks`]:
//! 1. Samples the clock once
//! 2. Walks the table in registration order
//! 3. For each task whose period has elapsed since its last run, sets
//!    `last_run` to the sampled time and runs the handler to completion
//!
//! `last_run` is reset to the pass's timestamp, not realigned to the period
//! grid the way [`crate::soft_timer::SoftTimer::is_elapsed_and_reset`] does.
//! A pass that runs late therefore shifts every later run of that task.
//!
//! ## Overload
//!
//! Nothing is isolated or measured. A slow handler delays every entry after
//! it in the same pass, and a handler that never returns stops the system.
//! Keep handlers short and free of blocking delays.

use heapless::Vec;
use log::{debug, warn};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::task::{Handler, Task, TaskId};
use crate::time::Timestamp;

/// Fixed-capacity table of periodic tasks.
///
/// `N` is the capacity, fixed at compile time. Tasks are added during
/// startup and never removed.
pub struct Dispatcher<const N: usize> {
    tasks: Vec<Task, N>,
}

impl<const N: usize> Dispatcher<N> {
    /// An empty table.
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Build a full table from `(handler, period_ms)` pairs.
    ///
    /// The table length equals the capacity, so this cannot fail.
    pub fn from_table(table: [(Handler, u32); N]) -> Self {
        // Exactly N entries into capacity N.
        let tasks = table
            .into_iter()
            .map(|(handler, period_ms)| Task::new(handler, period_ms))
            .collect();
        debug!("dispatcher: table of {} tasks", N);
        Self { tasks }
    }

    /// Append a task. Fails with [`Error::TableFull`] once `N` tasks exist.
    pub fn register_task(&mut self, handler: Handler, period_ms: u32) -> Result<TaskId> {
        let id = TaskId(self.tasks.len());
        if self.tasks.push(Task::new(handler, period_ms)).is_err() {
            warn!("dispatcher: table full ({} tasks), {}ms task rejected", N, period_ms);
            return Err(Error::TableFull);
        }
        debug!("dispatcher: task #{} registered, period {}ms", id.index(), period_ms);
        Ok(id)
    }

    /// Run every task that is due. Returns how many handlers ran.
    pub fn run_pending_tasks<C: Clock + ?Sized>(&mut self, clock: &C) -> usize {
        self.run_pending_at(clock.now_ms())
    }

    /// [`Dispatcher::run_pending_tasks`] with an already sampled timestamp.
    pub fn run_pending_at(&mut self, now: Timestamp) -> usize {
        let mut ran = 0;
        for task in self.tasks.iter_mut() {
            if task.poll(now) {
                ran += 1;
            }
        }
        ran
    }

    /// The superloop. Polls the table forever.
    pub fn run_forever<C: Clock + ?Sized>(&mut self, clock: &C) -> ! {
        loop {
            self.run_pending_tasks(clock);
        }
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True before the first registration.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Compile-time table capacity, `N`.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// The descriptor behind `id`, if registered.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.0)
    }

    /// How many times the task has run, or `None` for an unknown id.
    pub fn run_count(&self, id: TaskId) -> Option<u32> {
        self.task(id).map(|task| task.runs)
    }

    /// Descriptors in table (dispatch) order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }
}

impl<const N: usize> Default for Dispatcher<N> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests (host-only)
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::tick::TickCounter;
    use core::sync::atomic::{AtomicU32, Ordering};
    use std::vec::Vec as StdVec;

    fn noop() {}

    #[test]
    fn test_register_until_full() {
        let mut dispatcher: Dispatcher<2> = Dispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.capacity(), 2);

        assert_eq!(dispatcher.register_task(noop, 10), Ok(TaskId(0)));
        assert_eq!(dispatcher.register_task(noop, 20), Ok(TaskId(1)));
        assert_eq!(dispatcher.register_task(noop, 30), Err(Error::TableFull));
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn test_from_table_keeps_order() {
        let dispatcher = Dispatcher::from_table([(noop as Handler, 1), (noop, 50), (noop, 500)]);
        let periods: StdVec<u32> = dispatcher.iter().map(|t| t.period_ms).collect();
        assert_eq!(periods, [1, 50, 500]);
    }

    #[test]
    fn test_from_table_fills_capacity() {
        let mut dispatcher = Dispatcher::from_table([(noop as Handler, 1), (noop, 2)]);
        assert_eq!(dispatcher.len(), dispatcher.capacity());
        assert_eq!(dispatcher.run_count(TaskId(1)), Some(0));
        assert_eq!(dispatcher.register_task(noop, 3), Err(Error::TableFull));
    }

    #[test]
    fn test_nothing_due_before_period() {
        let mut dispatcher: Dispatcher<1> = Dispatcher::new();
        let id = dispatcher.register_task(noop, 10).unwrap();

        assert_eq!(dispatcher.run_pending_at(Timestamp::from_raw(9)), 0);
        assert_eq!(dispatcher.run_pending_at(Timestamp::from_raw(10)), 1);
        assert_eq!(dispatcher.run_count(id), Some(1));
        assert_eq!(dispatcher.run_count(TaskId(5)), None);
    }

    #[test]
    fn test_handlers_run_in_table_order() {
        static ORDER: AtomicU32 = AtomicU32::new(0);
        fn first() {
            ORDER.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(v * 10 + 1)).ok();
        }
        fn second() {
            ORDER.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |v| Some(v * 10 + 2)).ok();
        }

        let mut dispatcher = Dispatcher::from_table([(first as Handler, 5), (second, 5)]);
        assert_eq!(dispatcher.run_pending_at(Timestamp::from_raw(5)), 2);
        assert_eq!(ORDER.load(Ordering::SeqCst), 12);
    }

    #[test]
    fn test_one_sample_per_pass() {
        // The first handler burns 30ms of tick time; the second task is still
        // judged against the time sampled before the pass.
        static TICKS: TickCounter = TickCounter::starting_at(10);
        fn slow() {
            for _ in 0..30 {
                TICKS.increment();
            }
        }

        let mut dispatcher = Dispatcher::from_table([(slow as Handler, 10), (noop, 35)]);

        assert_eq!(dispatcher.run_pending_tasks(&TICKS), 1);
        assert_eq!(TICKS.now().raw(), 40);
        assert_eq!(dispatcher.task(TaskId(1)).unwrap().runs, 0);

        // Sampled at 40: both are due now.
        assert_eq!(dispatcher.run_pending_tasks(&TICKS), 2);
        assert_eq!(dispatcher.task(TaskId(1)).unwrap().runs, 1);
    }

    #[test]
    fn test_late_poll_drifts() {
        let mut dispatcher: Dispatcher<1> = Dispatcher::new();
        let id = dispatcher.register_task(noop, 100).unwrap();

        dispatcher.run_pending_at(Timestamp::from_raw(130));
        assert_eq!(dispatcher.task(id).unwrap().last_run.raw(), 130);

        assert_eq!(dispatcher.run_pending_at(Timestamp::from_raw(200)), 0);
        assert_eq!(dispatcher.run_pending_at(Timestamp::from_raw(230)), 1);
    }
}
