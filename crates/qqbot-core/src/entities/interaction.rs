//! Interactions (button clicks, commands)

use serde::{Deserialize, Serialize};

use super::lenient_id;

/// Payload of INTERACTION_CREATE
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Interaction {
    pub id: String,
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub application_id: String,
    #[serde(rename = "type")]
    pub kind: u32,
    pub data: InteractionData,
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub guild_id: String,
    #[serde(deserialize_with = "lenient_id::deserialize")]
    pub channel_id: String,
    pub version: u32,
}

/// Interaction body; `resolved` depends on `kind` and is kept untyped
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionData {
    #[serde(rename = "type")]
    pub kind: u32,
    pub resolved: serde_json::Value,
}

impl InteractionData {
    /// Button id for inline keyboard clicks
    pub fn button_id(&self) -> Option<&str> {
        self.resolved.get("button_id").and_then(|v| v.as_str())
    }
}
