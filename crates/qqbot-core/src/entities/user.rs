//! Users, the bot's own identity, and the READY payload

use serde::{Deserialize, Serialize};

/// A platform user as embedded in messages and member events
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bot: bool,
    pub union_openid: Option<String>,
    pub union_user_account: Option<String>,
}

/// The bot account that owns a gateway session
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Robot {
    pub id: String,
    pub username: String,
    pub bot: bool,
    pub status: i32,
}

/// Payload of the READY dispatch that completes an Identify
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadyEvent {
    pub version: u32,
    pub session_id: String,
    pub user: Robot,
    /// `[index, count]` as assigned by the gateway
    pub shard: Option<[u32; 2]>,
}

impl ReadyEvent {}
