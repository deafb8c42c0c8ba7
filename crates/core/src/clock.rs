//! Clock

use std::{cell::Cell, rc::Rc};

use jiff::{SignedDuration, Timestamp};

/// Source of the current time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Rc<Cell<Timestamp>>,
}

impl FixedClock {
    /// Clock frozen at `now`.
    pub fn new(now: Timestamp) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    /// Move the clock forward (or back, for negative durations).
    ///
    /// Out-of-range results leave the clock where it was.
    pub fn advance(&self, by: SignedDuration) {
        if let Ok(next) = self.now.get().checked_add(by) {
            self.now.set(next);
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}
