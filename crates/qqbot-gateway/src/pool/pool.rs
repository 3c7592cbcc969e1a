//! Session pool
//!
//! Owns every Session that is not currently connected and paces connection
//! starts so that no more than `max_concurrency` begin in any rolling window.
//! The backlog is a channel: connections push their Session back through a
//! [`SessionQueue`] while `run` is draining it.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info};

use super::window::StartWindow;
use super::{Connector, SessionQueue};
use crate::connection::Session;

/// Rate-limit window the platform applies to connection starts
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(5);

/// Spacing between batches: `ceil(window / max_concurrency)` whole seconds
///
/// Windows shorter than a second are split exactly.
pub fn start_interval(window: Duration, max_concurrency: u32) -> Duration {
    let slice = window / max_concurrency.max(1);
    if window < Duration::from_secs(1) {
        return slice;
    }
    Duration::from_secs(slice.as_secs() + u64::from(slice.subsec_nanos() > 0))
}

/// Backlog of Sessions awaiting a connection
#[derive(Debug)]
pub struct SessionPool {
    max_concurrency: usize,
    window: Duration,
    tx: mpsc::UnboundedSender<Session>,
    rx: Mutex<mpsc::UnboundedReceiver<Session>>,
}

impl SessionPool {
    /// Create a pool; a `max_concurrency` of 0 is treated as 1
    pub fn new(max_concurrency: u32) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            max_concurrency: max_concurrency.max(1) as usize,
            window: DEFAULT_WINDOW,
            tx,
            rx: Mutex::new(rx),
        }
    }

    /// Override the rate-limit window
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    #[inline]
    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    #[inline]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Handle used by connections to push their Session back
    pub fn queue(&self) -> SessionQueue {
        SessionQueue::new(self.tx.clone())
    }

    /// Populate the backlog, one Session per shard
    pub fn seed(&self, sessions: Vec<Session>) {
        let queue = self.queue();
        for session in sessions {
            queue.requeue(session);
        }
    }

    /// Drain the backlog in paced batches
    ///
    /// Batch `i` of the backlog starts no earlier than `interval * (i + 1)`
    /// and the start window is never exceeded. Returns once the backlog is
    /// empty and every connection task has finished without requeueing.
    pub async fn run(&self, interval: Duration, connector: Arc<dyn Connector>) {
        let mut backlog = self.rx.lock().await;
        let mut tasks = JoinSet::new();
        let mut window = StartWindow::new(self.max_concurrency, self.window);
        let mut next_start = Instant::now() + interval;
        let mut batch_index = 0usize;

        loop {
            let mut batch = Vec::with_capacity(self.max_concurrency);
            self.fill(&mut backlog, &mut batch);

            if batch.is_empty() {
                if tasks.is_empty() {
                    break;
                }
                tokio::select! {
                    Some(session) = backlog.recv() => {
                        batch.push(session);
                        self.fill(&mut backlog, &mut batch);
                    }
                    Some(joined) = tasks.join_next() => {
                        if let Err(e) = joined {
                            error!(error = %e, "Connection task failed");
                        }
                        continue;
                    }
                }
            }

            let slot = next_start.max(Instant::now());
            let mut last = slot;
            info!(
                batch = batch_index,
                size = batch.len(),
                max_concurrency = self.max_concurrency,
                delay_ms = slot.saturating_duration_since(Instant::now()).as_millis(),
                "Scheduling connection batch"
            );

            for session in batch {
                let at = window.reserve(slot);
                last = at;

                let connector = Arc::clone(&connector);
                let queue = self.queue();
                tasks.spawn(async move {
                    sleep_until(at).await;
                    debug!(shard = %session.shard(), "Starting connection");
                    connector.connect(session, queue).await;
                });
            }

            next_start = last + interval;
            batch_index += 1;
        }

        debug!(batches = batch_index, "Session pool drained");
    }

    fn fill(&self, backlog: &mut mpsc::UnboundedReceiver<Session>, batch: &mut Vec<Session>) {
        while batch.len() < self.max_concurrency {
            match backlog.try_recv() {
                Ok(session) => batch.push(session),
                Err(_) => break,
            }
        }
    }
}
