//! Voice channel audio events

use serde::{Deserialize, Serialize};

/// Payload of AUDIO_START/FINISH and AUDIO_ON_MIC/OFF_MIC
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioAction {
    pub guild_id: String,
    pub channel_id: String,
    pub audio_url: Option<String>,
    pub text: Option<String>,
}
