//! Gateway intent bitflags
//!
//! An intent set declares which event categories the gateway pushes to a shard.
//! It is sent once per Identify and cannot change for the life of a session.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Event categories a bot subscribes to
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Intents: u32 {
        /// GUILD_CREATE/UPDATE/DELETE, CHANNEL_CREATE/UPDATE/DELETE
        const GUILDS                  = 1 << 0;
        /// GUILD_MEMBER_ADD/UPDATE/REMOVE
        const GUILD_MEMBERS           = 1 << 1;
        /// MESSAGE_CREATE/DELETE (private bots only)
        const GUILD_MESSAGES          = 1 << 9;
        /// MESSAGE_REACTION_ADD/REMOVE
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        /// DIRECT_MESSAGE_CREATE/DELETE
        const DIRECT_MESSAGE          = 1 << 12;
        /// INTERACTION_CREATE
        const INTERACTION             = 1 << 26;
        /// MESSAGE_AUDIT_PASS/REJECT
        const MESSAGE_AUDIT           = 1 << 27;
        /// FORUM_* events (private bots only)
        const FORUMS                  = 1 << 28;
        /// AUDIO_START/FINISH, AUDIO_ON_MIC/OFF_MIC
        const AUDIO_ACTION            = 1 << 29;
        /// AT_MESSAGE_CREATE, PUBLIC_MESSAGE_DELETE
        const PUBLIC_GUILD_MESSAGES   = 1 << 30;
    }
}

/// Name table used for parsing and listing
const NAMED: &[(&str, Intents)] = &[
    ("guilds", Intents::GUILDS),
    ("guild_members", Intents::GUILD_MEMBERS),
    ("guild_messages", Intents::GUILD_MESSAGES),
    ("guild_message_reactions", Intents::GUILD_MESSAGE_REACTIONS),
    ("direct_message", Intents::DIRECT_MESSAGE),
    ("interaction", Intents::INTERACTION),
    ("message_audit", Intents::MESSAGE_AUDIT),
    ("forums", Intents::FORUMS),
    ("audio_action", Intents::AUDIO_ACTION),
    ("public_guild_messages", Intents::PUBLIC_GUILD_MESSAGES),
];

impl Intents {
    /// Every public-domain event category
    ///
    /// `GUILD_MESSAGES` and `FORUMS` require a private bot and are left out.
    #[must_use]
    pub fn default_public() -> Self {
        Self::all() - Self::GUILD_MESSAGES - Self::FORUMS
    }

    /// No subscriptions at all
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::empty()
    }

    /// Bits to put on the wire in an Identify request
    ///
    /// The gateway rejects an empty intent set, so it falls back to `GUILDS`.
    #[must_use]
    pub fn identify_bits(self) -> u32 {
        if self.is_empty() {
            Self::GUILDS.bits()
        } else {
            self.bits()
        }
    }

    /// Parse a comma-separated list of intent names (`"guilds, public_guild_messages"`)
    pub fn from_names(names: &str) -> Result<Self, IntentsParseError> {
        names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .try_fold(Self::empty(), |acc, name| {
                NAMED
                    .iter()
                    .find(|(known, _)| known.eq_ignore_ascii_case(name))
                    .map(|(_, flag)| acc | *flag)
                    .ok_or_else(|| IntentsParseError::UnknownName(name.to_string()))
            })
    }

    /// Names of every flag that is set
    pub fn names(&self) -> Vec<&'static str> {
        NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl Default for Intents {
    fn default() -> Self {
        Self::default_public()
    }
}

impl FromStr for Intents {
    type Err = IntentsParseError;

    /// Accepts either a decimal bitmask or a list of names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return trimmed
                .parse::<u32>()
                .map(Self::from_bits_truncate)
                .map_err(|_| IntentsParseError::InvalidBits(trimmed.to_string()));
        }
        Self::from_names(trimmed)
    }
}

impl fmt::Display for Intents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

impl Serialize for Intents {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for Intents {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        u32::deserialize(deserializer).map(Self::from_bits_truncate)
    }
}

/// Intent parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntentsParseError {
    #[error("unknown intent name: {0}")]
    UnknownName(String),

    #[error("invalid intent bitmask: {0}")]
    InvalidBits(String),
}
