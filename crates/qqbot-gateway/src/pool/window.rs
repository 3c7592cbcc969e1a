//! Sliding connection-start window

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Admits at most `capacity` connection starts in any `window`
#[derive(Debug)]
pub(crate) struct StartWindow {
    capacity: usize,
    window: Duration,
    starts: VecDeque<Instant>,
}

impl StartWindow {
    pub(crate) fn new(capacity: usize, window: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            window,
            starts: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Reserve the earliest start at or after `earliest` that keeps the window
    ///
    /// Reservations are handed out in non-decreasing order.
    pub(crate) fn reserve(&mut self, earliest: Instant) -> Instant {
        let mut at = earliest;
        if let Some(&last) = self.starts.back() {
            at = at.max(last);
        }
        if self.starts.len() == self.capacity {
            if let Some(&oldest) = self.starts.front() {
                at = at.max(oldest + self.window);
            }
            self.starts.pop_front();
        }
        self.starts.push_back(at);
        at
    }
}
