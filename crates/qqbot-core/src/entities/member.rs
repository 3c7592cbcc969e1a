//! Guild membership

use serde::{Deserialize, Serialize};

use super::User;

/// Membership data embedded in messages
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Member {
    pub user: Option<User>,
    pub nick: Option<String>,
    pub roles: Vec<String>,
    pub joined_at: Option<String>,
}

impl Member {
    /// Nickname if set, otherwise the username
    pub fn display_name(&self) -> Option<&str> {
        self.nick
            .as_deref()
            .filter(|nick| !nick.is_empty())
            .or_else(|| self.user.as_ref().map(|u| u.username.as_str()))
    }

    /// Check if the member holds a role
    #[inline]
    pub fn has_role(&self, role_id: &str) -> bool {
        self.roles.iter().any(|r| r == role_id)
    }
}

/// Payload of GUILD_MEMBER_ADD/UPDATE/REMOVE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GuildMember {
    pub guild_id: String,
    #[serde(flatten)]
    pub member: Member,
    pub op_user_id: Option<String>,
}
