//! Messages and message-audit notifications

use serde::{Deserialize, Serialize};

use super::{Member, User};

/// A message delivered by MESSAGE_CREATE, AT_MESSAGE_CREATE or DIRECT_MESSAGE_CREATE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
    pub guild_id: String,
    pub content: String,
    pub timestamp: Option<String>,
    pub edited_timestamp: Option<String>,
    pub mention_everyone: bool,
    pub author: Option<User>,
    pub member: Option<Member>,
    pub attachments: Vec<MessageAttachment>,
    pub mentions: Vec<User>,
    pub message_reference: Option<MessageReference>,
    /// Direct messages carry the guild the conversation originated from
    pub src_guild_id: Option<String>,
    pub seq: Option<u64>,
    pub seq_in_channel: Option<String>,
}

impl Message {
    /// Check if the message replies to another
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.message_reference.is_some()
    }

    /// Check if a user is @-mentioned
    pub fn mentions_user(&self, user_id: &str) -> bool {
        self.mentions.iter().any(|u| u.id == user_id)
    }

    /// Content with `<@!id>` mention markup stripped and whitespace trimmed
    pub fn plain_content(&self) -> String {
        let mut out = String::with_capacity(self.content.len());
        let mut rest = self.content.as_str();
        while let Some(start) = rest.find("<@") {
            out.push_str(&rest[..start]);
            match rest[start..].find('>') {
                Some(end) => rest = &rest[start + end + 1..],
                None => {
                    rest = &rest[start..];
                    break;
                }
            }
        }
        out.push_str(rest);
        out.trim().to_string()
    }
}

/// File attached to a message
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageAttachment {
    pub url: String,
    pub content_type: Option<String>,
    pub filename: Option<String>,
    pub size: Option<u64>,
}

/// Reference to the message being replied to
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageReference {
    pub message_id: String,
    pub ignore_get_message_error: bool,
}

/// Payload of MESSAGE_DELETE, PUBLIC_MESSAGE_DELETE and DIRECT_MESSAGE_DELETE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageDelete {
    pub message: Message,
    /// Who deleted it; absent when the author deleted their own message
    pub op_user: Option<User>,
}

impl MessageDelete {
    /// Check whether someone other than the author removed the message
    pub fn deleted_by_other(&self) -> bool {
        match (&self.op_user, &self.message.author) {
            (Some(op), Some(author)) => op.id != author.id,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

/// Payload of MESSAGE_AUDIT_PASS / MESSAGE_AUDIT_REJECT
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageAudit {
    pub audit_id: String,
    /// Only present once the audit passed
    pub message_id: Option<String>,
    pub guild_id: String,
    pub channel_id: String,
    pub audit_time: Option<String>,
    pub create_time: Option<String>,
    pub seq_in_channel: Option<String>,
}
