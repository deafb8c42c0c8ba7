//! Timers backed by `window.setTimeout`.

use std::time::Duration;

use leptos::prelude::set_timeout;
use mandanda::scheduler::{Scheduler, Task};

/// Runs tasks from the browser event loop.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct TimeoutScheduler;

impl Scheduler for TimeoutScheduler {
    fn schedule(&self, delay: Duration, task: Task) {
        set_timeout(task, delay);
    }
}
