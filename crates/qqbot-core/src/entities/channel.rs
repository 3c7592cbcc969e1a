//! Channel entity and its numeric type codes

use serde::{Deserialize, Serialize};

/// Channel kind, encoded as an integer on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ChannelType {
    #[default]
    Text,
    Voice,
    /// Grouping node for other channels
    Group,
    Live,
    Application,
    Forum,
    /// Reserved or newer codes are kept verbatim
    Other(u32),
}

impl From<u32> for ChannelType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Text,
            2 => Self::Voice,
            4 => Self::Group,
            10005 => Self::Live,
            10006 => Self::Application,
            10007 => Self::Forum,
            other => Self::Other(other),
        }
    }
}

impl From<ChannelType> for u32 {
    fn from(ct: ChannelType) -> Self {
        match ct {
            ChannelType::Text => 0,
            ChannelType::Voice => 2,
            ChannelType::Group => 4,
            ChannelType::Live => 10005,
            ChannelType::Application => 10006,
            ChannelType::Forum => 10007,
            ChannelType::Other(code) => code,
        }
    }
}

/// Text channel sub-category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub enum ChannelSubType {
    #[default]
    Talk,
    Post,
    Cheat,
    Black,
    Other(u32),
}

impl From<u32> for ChannelSubType {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::Talk,
            1 => Self::Post,
            2 => Self::Cheat,
            3 => Self::Black,
            other => Self::Other(other),
        }
    }
}

impl From<ChannelSubType> for u32 {
    fn from(st: ChannelSubType) -> Self {
        match st {
            ChannelSubType::Talk => 0,
            ChannelSubType::Post => 1,
            ChannelSubType::Cheat => 2,
            ChannelSubType::Black => 3,
            ChannelSubType::Other(code) => code,
        }
    }
}

/// Channel entity as carried by CHANNEL_CREATE/UPDATE/DELETE
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Channel {
    pub id: String,
    pub guild_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    pub sub_type: ChannelSubType,
    pub position: i64,
    pub parent_id: Option<String>,
    pub owner_id: Option<String>,
    pub op_user_id: Option<String>,
}

impl Channel {
    /// Check if this channel can hold text messages
    #[inline]
    pub fn is_text(&self) -> bool {
        self.channel_type == ChannelType::Text
    }
}
