//! Forum threads, posts, replies and publish-audit results

use serde::{Deserialize, Serialize};

/// Payload of FORUM_THREAD_CREATE/UPDATE/DELETE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Thread {
    pub guild_id: String,
    pub channel_id: String,
    pub author_id: String,
    pub thread_info: ThreadInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThreadInfo {
    pub thread_id: String,
    pub title: String,
    /// Rich-text document serialized as a JSON string
    pub content: String,
    pub date_time: String,
}

/// Payload of FORUM_POST_CREATE/DELETE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub guild_id: String,
    pub channel_id: String,
    pub author_id: String,
    pub post_info: PostInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PostInfo {
    pub thread_id: String,
    pub post_id: String,
    pub content: String,
    pub date_time: String,
}

/// Payload of FORUM_REPLY_CREATE/DELETE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Reply {
    pub guild_id: String,
    pub channel_id: String,
    pub author_id: String,
    pub reply_info: ReplyInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyInfo {
    pub thread_id: String,
    pub post_id: String,
    pub reply_id: String,
    pub content: String,
    pub date_time: String,
}

/// Payload of FORUM_PUBLISH_AUDIT_RESULT
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuditResult {
    pub guild_id: String,
    pub channel_id: String,
    pub author_id: String,
    pub thread_id: String,
    pub post_id: String,
    pub reply_id: String,
    /// 1 thread, 2 post, 3 reply
    #[serde(rename = "type")]
    pub audit_type: u8,
    /// 0 passed, anything else rejected
    pub result: i32,
    pub err_msg: String,
}

impl AuditResult {
    #[inline]
    pub fn passed(&self) -> bool {
        self.result == 0
    }
}
