//! Handshake payload definitions

use qqbot_core::Intents;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `d` of the first frame the server sends (op 10)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HelloPayload {
    /// Milliseconds
    #[serde(default)]
    pub heartbeat_interval: u64,
}

impl HelloPayload {
    /// `None` when the server sent zero or omitted the field
    pub fn interval(&self) -> Option<Duration> {
        (self.heartbeat_interval > 0).then(|| Duration::from_millis(self.heartbeat_interval))
    }
}

/// `d` of an Identify (op 2)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyPayload {
    /// Authorization string (`Bot ...` or `QQBot ...`)
    pub token: String,

    /// Intent bitmask; never zero on the wire
    pub intents: u32,

    /// `[shard_index, shard_count]`
    pub shard: [u32; 2],

    #[serde(default)]
    pub properties: IdentifyProperties,
}

impl IdentifyPayload {
    #[must_use]
    pub fn new(token: impl Into<String>, intents: Intents, shard: [u32; 2]) -> Self {
        Self {
            token: token.into(),
            intents: intents.identify_bits(),
            shard,
            properties: IdentifyProperties::default(),
        }
    }
}

/// Reported to the platform alongside Identify
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyProperties {
    #[serde(rename = "$os")]
    pub os: String,

    #[serde(rename = "$browser")]
    pub browser: String,

    #[serde(rename = "$device")]
    pub device: String,
}

impl Default for IdentifyProperties {
    fn default() -> Self {
        Self {
            os: std::env::consts::OS.to_string(),
            browser: env!("CARGO_PKG_NAME").to_string(),
            device: env!("CARGO_PKG_NAME").to_string(),
        }
    }
}

/// Session identity carried by a READY dispatch
///
/// The rest of the payload (bot user, version) is left to the event decoder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReadyPayload {
    pub session_id: String,
    /// `[shard_index, shard_count]` as assigned by the platform
    #[serde(default)]
    pub shard: Option<[u32; 2]>,
}

/// `d` of a Resume (op 6)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResumePayload {
    pub token: String,
    pub session_id: String,
    /// Highest sequence seen on the session
    pub seq: u64,
}
