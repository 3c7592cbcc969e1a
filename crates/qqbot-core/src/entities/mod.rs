//! Value types decoded from gateway dispatch payloads
//!
//! Every type is lenient: missing fields fall back to defaults, because the
//! platform omits fields freely depending on the event and the bot's scope.

mod audio;
mod channel;
mod forum;
mod guild;
mod interaction;
mod member;
mod message;
mod reaction;
mod user;

pub use audio::AudioAction;
pub use channel::{Channel, ChannelSubType, ChannelType};
pub use forum::{AuditResult, Post, PostInfo, Reply, ReplyInfo, Thread, ThreadInfo};
pub use guild::{DirectMessageGuild, Guild};
pub use interaction::{Interaction, InteractionData};
pub use member::{GuildMember, Member};
pub use message::{Message, MessageAttachment, MessageAudit, MessageDelete, MessageReference};
pub use reaction::{Emoji, Reaction, ReactionTarget};
pub use user::{ReadyEvent, Robot, User};

/// Identifier fields arrive as strings on most events and as bare numbers on a few
pub(crate) mod lenient_id {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(u64),
        Null,
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => s,
            Raw::Number(n) => n.to_string(),
            Raw::Null => String::new(),
        })
    }
}
