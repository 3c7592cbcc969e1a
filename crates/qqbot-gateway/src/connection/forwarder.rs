//! Event forwarding
//!
//! Dispatches are handed to the application on their own task so the receive
//! loop keeps reading ACKs and control frames while a handler is busy. One
//! task per connection consumes a channel, which keeps events in receipt order.

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::error;

use super::ShardInfo;
use crate::events::{DispatchError, EventContext, EventDispatcher};

/// Per-connection event worker
#[derive(Debug)]
pub struct EventForwarder {
    shard: ShardInfo,
    tx: mpsc::UnboundedSender<(EventContext, Value)>,
    task: JoinHandle<()>,
}

impl EventForwarder {
    /// Start the worker
    ///
    /// A payload the dispatcher rejects is reported on `failed`; later events
    /// are still handled.
    pub fn spawn(
        shard: ShardInfo,
        dispatcher: Arc<EventDispatcher>,
        failed: mpsc::Sender<DispatchError>,
    ) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<(EventContext, Value)>();
        let task = tokio::spawn(async move {
            while let Some((ctx, data)) = rx.recv().await {
                if let Err(e) = dispatcher.handle(ctx, data).await {
                    let _ = failed.try_send(e);
                }
            }
        });
        Self { shard, tx, task }
    }

    /// Queue one dispatch; `false` once the worker is gone
    pub fn forward(&self, ctx: EventContext, data: Value) -> bool {
        self.tx.send((ctx, data)).is_ok()
    }

    /// Stop accepting events and wait until the queued ones are handled
    pub async fn finish(self) {
        let Self { shard, tx, task } = self;
        drop(tx);
        if let Err(e) = task.await {
            error!(shard = %shard, error = %e, "Event handler task failed");
        }
    }
}
