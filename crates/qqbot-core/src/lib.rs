//! # qqbot-core
//!
//! Domain layer: the intent bitmask a bot subscribes with and the value types
//! decoded from gateway dispatch payloads. No I/O lives here.

pub mod entities;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AudioAction, AuditResult, Channel, ChannelSubType, ChannelType, DirectMessageGuild, Emoji,
    Guild, GuildMember, Interaction, InteractionData, Member, Message, MessageAttachment,
    MessageAudit, MessageDelete, MessageReference, Post, PostInfo, Reaction, ReactionTarget,
    ReadyEvent, Reply, ReplyInfo, Robot, Thread, ThreadInfo, User,
};
pub use value_objects::{Intents, IntentsParseError};
