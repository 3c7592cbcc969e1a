//! Decoded dispatch events

use qqbot_core::{
    AudioAction, AuditResult, Channel, Guild, GuildMember, Interaction, Message, MessageAudit,
    MessageDelete, Post, Reaction, ReadyEvent, Reply, Thread,
};
use serde_json::Value;

use super::GatewayEventType;
use crate::connection::ShardInfo;

/// Where a dispatch came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    /// Wire name from the `t` field
    pub event_type: String,
    /// Envelope `id`, used when replying to the event
    pub event_id: Option<String>,
    pub shard: ShardInfo,
    /// Session sequence after this frame was recorded
    pub sequence: u64,
}

impl EventContext {
    /// Known event type, if any
    pub fn kind(&self) -> Option<GatewayEventType> {
        GatewayEventType::from_str(&self.event_type)
    }
}

/// A dispatch with no registered decoder, handed over undecoded
#[derive(Debug, Clone, PartialEq)]
pub struct RawEvent {
    pub context: EventContext,
    pub data: Value,
}

/// A decoded dispatch payload
#[derive(Debug, Clone, PartialEq)]
pub enum BotEvent {
    Ready(ReadyEvent),
    Resumed,

    GuildCreate(Guild),
    GuildUpdate(Guild),
    GuildDelete(Guild),

    ChannelCreate(Channel),
    ChannelUpdate(Channel),
    ChannelDelete(Channel),

    GuildMemberAdd(GuildMember),
    GuildMemberUpdate(GuildMember),
    GuildMemberRemove(GuildMember),

    MessageCreate(Message),
    MessageDelete(MessageDelete),
    AtMessageCreate(Message),
    PublicMessageDelete(MessageDelete),
    DirectMessageCreate(Message),
    DirectMessageDelete(MessageDelete),

    MessageReactionAdd(Reaction),
    MessageReactionRemove(Reaction),

    InteractionCreate(Interaction),

    MessageAuditPass(MessageAudit),
    MessageAuditReject(MessageAudit),

    AudioStart(AudioAction),
    AudioFinish(AudioAction),
    AudioOnMic(AudioAction),
    AudioOffMic(AudioAction),

    ForumThreadCreate(Thread),
    ForumThreadUpdate(Thread),
    ForumThreadDelete(Thread),
    ForumPostCreate(Post),
    ForumPostDelete(Post),
    ForumReplyCreate(Reply),
    ForumReplyDelete(Reply),
    ForumPublishAuditResult(AuditResult),
}

impl BotEvent {
    /// The event type this value was decoded from
    #[must_use]
    pub fn event_type(&self) -> GatewayEventType {
        use GatewayEventType as T;

        match self {
            Self::Ready(_) => T::Ready,
            Self::Resumed => T::Resumed,
            Self::GuildCreate(_) => T::GuildCreate,
            Self::GuildUpdate(_) => T::GuildUpdate,
            Self::GuildDelete(_) => T::GuildDelete,
            Self::ChannelCreate(_) => T::ChannelCreate,
            Self::ChannelUpdate(_) => T::ChannelUpdate,
            Self::ChannelDelete(_) => T::ChannelDelete,
            Self::GuildMemberAdd(_) => T::GuildMemberAdd,
            Self::GuildMemberUpdate(_) => T::GuildMemberUpdate,
            Self::GuildMemberRemove(_) => T::GuildMemberRemove,
            Self::MessageCreate(_) => T::MessageCreate,
            Self::MessageDelete(_) => T::MessageDelete,
            Self::AtMessageCreate(_) => T::AtMessageCreate,
            Self::PublicMessageDelete(_) => T::PublicMessageDelete,
            Self::DirectMessageCreate(_) => T::DirectMessageCreate,
            Self::DirectMessageDelete(_) => T::DirectMessageDelete,
            Self::MessageReactionAdd(_) => T::MessageReactionAdd,
            Self::MessageReactionRemove(_) => T::MessageReactionRemove,
            Self::InteractionCreate(_) => T::InteractionCreate,
            Self::MessageAuditPass(_) => T::MessageAuditPass,
            Self::MessageAuditReject(_) => T::MessageAuditReject,
            Self::AudioStart(_) => T::AudioStart,
            Self::AudioFinish(_) => T::AudioFinish,
            Self::AudioOnMic(_) => T::AudioOnMic,
            Self::AudioOffMic(_) => T::AudioOffMic,
            Self::ForumThreadCreate(_) => T::ForumThreadCreate,
            Self::ForumThreadUpdate(_) => T::ForumThreadUpdate,
            Self::ForumThreadDelete(_) => T::ForumThreadDelete,
            Self::ForumPostCreate(_) => T::ForumPostCreate,
            Self::ForumPostDelete(_) => T::ForumPostDelete,
            Self::ForumReplyCreate(_) => T::ForumReplyCreate,
            Self::ForumReplyDelete(_) => T::ForumReplyDelete,
            Self::ForumPublishAuditResult(_) => T::ForumPublishAuditResult,
        }
    }

    /// The message carried by any of the message-create events
    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::MessageCreate(m) | Self::AtMessageCreate(m) | Self::DirectMessageCreate(m) => {
                Some(m)
            }
            _ => None,
        }
    }
}
