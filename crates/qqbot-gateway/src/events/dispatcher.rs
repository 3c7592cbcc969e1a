//! Event dispatcher
//!
//! Routes a dispatch frame to the decoder registered for its event type and
//! hands the decoded value to the application's handler. One instance is
//! built at startup and shared by every shard.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use super::{BotEvent, EventContext, GatewayEventType, RawEvent};

/// Turns a raw `d` payload into a typed event
pub type DecodeFn = fn(Value) -> Result<BotEvent, serde_json::Error>;

/// Application-level receiver of decoded events
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_event(&self, ctx: EventContext, event: BotEvent);
}

/// Catch-all receiver for events without a decoder
#[async_trait]
pub trait PlainEventHandler: Send + Sync {
    async fn on_raw(&self, event: RawEvent);
}

/// Dispatch errors
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("malformed {event_type} payload: {source}")]
    Decode {
        event_type: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Decoder for each known event type
fn default_decoder(event: GatewayEventType) -> DecodeFn {
    use GatewayEventType as T;

    match event {
        T::Ready => |d| serde_json::from_value(d).map(BotEvent::Ready),
        T::Resumed => |_| Ok(BotEvent::Resumed),
        T::GuildCreate => |d| serde_json::from_value(d).map(BotEvent::GuildCreate),
        T::GuildUpdate => |d| serde_json::from_value(d).map(BotEvent::GuildUpdate),
        T::GuildDelete => |d| serde_json::from_value(d).map(BotEvent::GuildDelete),
        T::ChannelCreate => |d| serde_json::from_value(d).map(BotEvent::ChannelCreate),
        T::ChannelUpdate => |d| serde_json::from_value(d).map(BotEvent::ChannelUpdate),
        T::ChannelDelete => |d| serde_json::from_value(d).map(BotEvent::ChannelDelete),
        T::GuildMemberAdd => |d| serde_json::from_value(d).map(BotEvent::GuildMemberAdd),
        T::GuildMemberUpdate => |d| serde_json::from_value(d).map(BotEvent::GuildMemberUpdate),
        T::GuildMemberRemove => |d| serde_json::from_value(d).map(BotEvent::GuildMemberRemove),
        T::MessageCreate => |d| serde_json::from_value(d).map(BotEvent::MessageCreate),
        T::MessageDelete => |d| serde_json::from_value(d).map(BotEvent::MessageDelete),
        T::AtMessageCreate => |d| serde_json::from_value(d).map(BotEvent::AtMessageCreate),
        T::PublicMessageDelete => |d| serde_json::from_value(d).map(BotEvent::PublicMessageDelete),
        T::DirectMessageCreate => |d| serde_json::from_value(d).map(BotEvent::DirectMessageCreate),
        T::DirectMessageDelete => |d| serde_json::from_value(d).map(BotEvent::DirectMessageDelete),
        T::MessageReactionAdd => |d| serde_json::from_value(d).map(BotEvent::MessageReactionAdd),
        T::MessageReactionRemove => {
            |d| serde_json::from_value(d).map(BotEvent::MessageReactionRemove)
        }
        T::InteractionCreate => |d| serde_json::from_value(d).map(BotEvent::InteractionCreate),
        T::MessageAuditPass => |d| serde_json::from_value(d).map(BotEvent::MessageAuditPass),
        T::MessageAuditReject => |d| serde_json::from_value(d).map(BotEvent::MessageAuditReject),
        T::AudioStart => |d| serde_json::from_value(d).map(BotEvent::AudioStart),
        T::AudioFinish => |d| serde_json::from_value(d).map(BotEvent::AudioFinish),
        T::AudioOnMic => |d| serde_json::from_value(d).map(BotEvent::AudioOnMic),
        T::AudioOffMic => |d| serde_json::from_value(d).map(BotEvent::AudioOffMic),
        T::ForumThreadCreate => |d| serde_json::from_value(d).map(BotEvent::ForumThreadCreate),
        T::ForumThreadUpdate => |d| serde_json::from_value(d).map(BotEvent::ForumThreadUpdate),
        T::ForumThreadDelete => |d| serde_json::from_value(d).map(BotEvent::ForumThreadDelete),
        T::ForumPostCreate => |d| serde_json::from_value(d).map(BotEvent::ForumPostCreate),
        T::ForumPostDelete => |d| serde_json::from_value(d).map(BotEvent::ForumPostDelete),
        T::ForumReplyCreate => |d| serde_json::from_value(d).map(BotEvent::ForumReplyCreate),
        T::ForumReplyDelete => |d| serde_json::from_value(d).map(BotEvent::ForumReplyDelete),
        T::ForumPublishAuditResult => {
            |d| serde_json::from_value(d).map(BotEvent::ForumPublishAuditResult)
        }
    }
}

/// Event-type → decoder registry plus the sinks events are forwarded to
pub struct EventDispatcher {
    decoders: HashMap<String, DecodeFn>,
    handler: Arc<dyn EventHandler>,
    plain: Option<Arc<dyn PlainEventHandler>>,
}

impl EventDispatcher {
    /// Dispatcher with an empty registry
    pub fn new(handler: Arc<dyn EventHandler>) -> Self {
        Self {
            decoders: HashMap::new(),
            handler,
            plain: None,
        }
    }

    /// Dispatcher with a decoder for every known event type
    pub fn with_default_decoders(handler: Arc<dyn EventHandler>) -> Self {
        let mut dispatcher = Self::new(handler);
        for event in GatewayEventType::ALL {
            dispatcher.register(event.as_str(), default_decoder(*event));
        }
        dispatcher
    }

    /// Route unregistered event types to `plain` instead of dropping them
    #[must_use]
    pub fn with_plain_handler(mut self, plain: Arc<dyn PlainEventHandler>) -> Self {
        self.plain = Some(plain);
        self
    }

    /// Register (or replace) the decoder for an event type
    pub fn register(&mut self, event_type: impl Into<String>, decode: DecodeFn) {
        self.decoders.insert(event_type.into(), decode);
    }

    /// Remove the decoder for an event type
    pub fn unregister(&mut self, event_type: &str) -> bool {
        self.decoders.remove(event_type).is_some()
    }

    pub fn is_registered(&self, event_type: &str) -> bool {
        self.decoders.contains_key(event_type)
    }

    /// Decode one dispatch payload and forward it
    ///
    /// Returns an error only when a registered decoder rejects the payload.
    pub async fn handle(&self, ctx: EventContext, raw: Value) -> Result<(), DispatchError> {
        let Some(decode) = self.decoders.get(&ctx.event_type) else {
            match &self.plain {
                Some(plain) => plain.on_raw(RawEvent { context: ctx, data: raw }).await,
                None => tracing::debug!(
                    event_type = %ctx.event_type,
                    shard = %ctx.shard,
                    "No decoder registered, event dropped"
                ),
            }
            return Ok(());
        };

        let event = decode(raw).map_err(|source| DispatchError::Decode {
            event_type: ctx.event_type.clone(),
            source,
        })?;
        self.handler.on_event(ctx, event).await;
        Ok(())
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("decoders", &self.decoders.len())
            .field("plain", &self.plain.is_some())
            .finish()
    }
}
