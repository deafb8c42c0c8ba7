//! Delayed tasks
//!
//! Fire-and-forget callbacks run once after a delay, on the calling thread.
//! There is no cancellation: a task that never comes due is simply dropped
//! with its scheduler.

use std::{cell::RefCell, fmt, rc::Rc, time::Duration};

/// A deferred callback.
pub type Task = Box<dyn FnOnce()>;

/// Runs tasks after a delay.
pub trait Scheduler {
    /// Run `task` once, no earlier than `delay` from now.
    fn schedule(&self, delay: Duration, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule(&self, delay: Duration, task: Task) {
        (**self).schedule(delay, task);
    }
}

/// Runs every task straight away, ignoring the delay.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, _delay: Duration, task: Task) {
        task();
    }
}

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

#[derive(Default)]
struct Timeline {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

impl Timeline {
    fn take_due(&mut self, until: Duration) -> Option<Pending> {
        let position = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= until)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(position, _)| position)?;

        let pending = self.pending.swap_remove(position);
        self.now = pending.due;

        Some(pending)
    }
}

/// Scheduler driven by explicit [`advance`](ManualScheduler::advance) calls.
///
/// Clones share one timeline.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    timeline: Rc<RefCell<Timeline>>,
}

impl ManualScheduler {
    /// Create a scheduler at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `by`, running every task that falls due, in due
    /// order. Tasks scheduled by running tasks are included when they fall
    /// inside the window.
    pub fn advance(&self, by: Duration) {
        let until = self.timeline.borrow().now.saturating_add(by);

        loop {
            let next = self.timeline.borrow_mut().take_due(until);

            match next {
                Some(pending) => (pending.task)(),
                None => break,
            }
        }

        self.timeline.borrow_mut().now = until;
    }

    /// Time elapsed since the scheduler was created.
    pub fn elapsed(&self) -> Duration {
        self.timeline.borrow().now
    }

    /// Number of tasks still waiting.
    pub fn pending(&self) -> usize {
        self.timeline.borrow().pending.len()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        let mut timeline = self.timeline.borrow_mut();
        let due = timeline.now.saturating_add(delay);
        let seq = timeline.next_seq;

        timeline.next_seq = seq.saturating_add(1);
        timeline.pending.push(Pending { due, seq, task });
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("elapsed", &self.elapsed())
            .field("pending", &self.pending())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    fn recorder() -> (Rc<RefCell<Vec<&'static str>>>, impl Fn(&'static str) -> Task) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);

        let make = move |label: &'static str| -> Task {
            let sink = Rc::clone(&sink);
            Box::new(move || sink.borrow_mut().push(label))
        };

        (log, make)
    }

    #[test]
    fn tasks_run_only_when_due() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(Duration::from_millis(1_000), task("late"));

        scheduler.advance(Duration::from_millis(999));
        assert!(log.borrow().is_empty(), "task ran early");

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(*log.borrow(), vec!["late"]);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn tasks_run_in_due_then_insertion_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.schedule(Duration::from_millis(20), task("c"));
        scheduler.schedule(Duration::from_millis(10), task("a"));
        scheduler.schedule(Duration::from_millis(10), task("b"));

        scheduler.advance(Duration::from_millis(50));

        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
        assert_eq!(scheduler.elapsed(), Duration::from_millis(50));
    }

    #[test]
    fn chained_tasks_within_window_run() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        let inner_scheduler = scheduler.clone();
        let second = task("second");
        let first = task("first");

        scheduler.schedule(
            Duration::from_millis(100),
            Box::new(move || {
                first();
                inner_scheduler.schedule(Duration::from_millis(100), second);
            }),
        );

        scheduler.advance(Duration::from_millis(150));
        assert_eq!(*log.borrow(), vec!["first"]);

        scheduler.advance(Duration::from_millis(50));
        assert_eq!(*log.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn immediate_scheduler_runs_inline() {
        let (log, task) = recorder();

        ImmediateScheduler.schedule(Duration::from_secs(5), task("now"));

        assert_eq!(*log.borrow(), vec!["now"]);
    }
}
