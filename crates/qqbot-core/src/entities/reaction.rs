//! Emoji reactions

use serde::{Deserialize, Serialize};

/// Payload of MESSAGE_REACTION_ADD / MESSAGE_REACTION_REMOVE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reaction {
    pub user_id: String,
    pub guild_id: String,
    pub channel_id: String,
    pub target: ReactionTarget,
    pub emoji: Emoji,
}

/// What was reacted to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReactionTarget {
    pub id: String,
    /// 0 message, 1 post, 2 comment, 3 reply
    #[serde(rename = "type")]
    pub target_type: u8,
}

impl ReactionTarget {
    #[inline]
    pub fn is_message(&self) -> bool {
        self.target_type == 0
    }
}

/// Emoji reference; type 1 is a system emoji, type 2 a unicode emoji
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Emoji {
    pub id: String,
    #[serde(rename = "type")]
    pub emoji_type: u8,
}
