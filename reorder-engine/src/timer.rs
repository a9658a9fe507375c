//! Virtual-time timer queue.
//!
//! The hook never sleeps. Deferred work (clearing transition styles once an
//! animation has run) is queued here and released when the host advances the
//! clock, so tests drive time explicitly and teardown can drop everything
//! still outstanding.

use reorder_dom::{DomResult, ListDom};
use std::fmt;
use std::time::Duration;

/// Deferred DOM work.
pub type TimerTask = Box<dyn FnOnce(&mut dyn ListDom) -> DomResult<()> + Send>;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Scheduled {
    id: TimerId,
    deadline: Duration,
    task: TimerTask,
}

/// Tasks ordered by deadline, then by scheduling order.
#[derive(Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    scheduled: Vec<Scheduled>,
}

impl fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerQueue")
            .field("now", &self.now)
            .field("scheduled", &self.scheduled.len())
            .finish()
    }
}

impl TimerQueue {
    /// Creates an empty queue at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `task` to run once `delay` has elapsed.
    pub fn schedule(&mut self, delay: Duration, task: TimerTask) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.scheduled.push(Scheduled {
            id,
            deadline: self.now + delay,
            task,
        });
        id
    }

    /// Drops a task before it runs. Returns false if it already ran or was
    /// never scheduled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.id != id);
        self.scheduled.len() != before
    }

    /// Moves the clock forward and returns the tasks that became due.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<TimerTask> {
        self.now += elapsed;
        let now = self.now;
        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|s| s.deadline <= now);
        self.scheduled = waiting;
        due.sort_by_key(|s| (s.deadline, s.id));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Time until the earliest task is due.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.scheduled
            .iter()
            .map(|s| s.deadline.saturating_sub(self.now))
            .min()
    }

    /// Drops every outstanding task.
    pub fn clear(&mut self) {
        self.scheduled.clear();
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }
}
