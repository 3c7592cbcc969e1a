//! Ready-made event handlers

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::info;

use super::{BotEvent, EventContext, EventHandler, PlainEventHandler, RawEvent};

/// Forwards decoded events into an unbounded channel
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<(EventContext, BotEvent)>,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(EventContext, BotEvent)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl EventHandler for ChannelSink {
    async fn on_event(&self, ctx: EventContext, event: BotEvent) {
        if self.tx.send((ctx, event)).is_err() {
            tracing::debug!("Event receiver dropped");
        }
    }
}

/// Logs every event it receives
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingHandler;

#[async_trait]
impl EventHandler for LoggingHandler {
    async fn on_event(&self, ctx: EventContext, event: BotEvent) {
        match event.message() {
            Some(message) => info!(
                event_type = %ctx.event_type,
                shard = %ctx.shard,
                seq = ctx.sequence,
                channel_id = %message.channel_id,
                content = %message.plain_content(),
                "Message received"
            ),
            None => info!(
                event_type = %ctx.event_type,
                event_id = ?ctx.event_id,
                shard = %ctx.shard,
                seq = ctx.sequence,
                "Event received"
            ),
        }
    }
}

#[async_trait]
impl PlainEventHandler for LoggingHandler {
    async fn on_raw(&self, event: RawEvent) {
        info!(
            event_type = %event.context.event_type,
            shard = %event.context.shard,
            data = %event.data,
            "Unhandled event received"
        );
    }
}
