//! Requeue handle given to every connection

use tokio::sync::mpsc;

use crate::connection::Session;

/// Pushes a Session back onto the pool backlog
///
/// Cheap to clone; every connection holds one.
#[derive(Debug, Clone)]
pub struct SessionQueue {
    tx: mpsc::UnboundedSender<Session>,
}

impl SessionQueue {
    pub(crate) fn new(tx: mpsc::UnboundedSender<Session>) -> Self {
        Self { tx }
    }

    /// Hand a Session back for another connection attempt
    pub fn requeue(&self, session: Session) {
        let shard = session.shard();
        if self.tx.send(session).is_err() {
            tracing::warn!(shard = %shard, "Session pool is gone, session dropped");
            return;
        }
        tracing::debug!(shard = %shard, "Session requeued");
    }
}
