//! Guilds and direct-message pseudo-guilds

use serde::{Deserialize, Serialize};

/// Guild entity as carried by GUILD_CREATE/UPDATE/DELETE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Guild {
    pub id: String,
    pub name: String,
    pub icon: Option<String>,
    pub owner_id: String,
    pub owner: bool,
    pub member_count: u32,
    pub max_members: u32,
    pub description: Option<String>,
    pub joined_at: Option<String>,
    /// Who triggered the change, for update/delete events
    pub op_user_id: Option<String>,
}

impl Guild {
    /// Check whether the guild is at its member cap
    #[inline]
    pub fn is_full(&self) -> bool {
        self.max_members > 0 && self.member_count >= self.max_members
    }
}

/// A direct-message session; each one is modelled as its own guild
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectMessageGuild {
    pub guild_id: String,
    pub channel_id: String,
    pub create_time: Option<String>,
}
