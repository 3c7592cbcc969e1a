//! Gateway frame envelope

use super::{HelloPayload, IdentifyPayload, OpCode, ResumePayload};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Gateway frame
///
/// Every text frame in either direction is one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMessage {
    pub op: OpCode,

    /// Event id (op=0 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Event type (op=0 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,

    /// Sequence number (op=0 only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<u64>,

    /// Payload; its shape depends on `op` and `t`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub d: Option<Value>,
}

impl GatewayMessage {
    fn bare(op: OpCode) -> Self {
        Self {
            op,
            id: None,
            t: None,
            s: None,
            d: None,
        }
    }

    /// Heartbeat (op=1); `d` is `null` until a sequence has been seen
    #[must_use]
    pub fn heartbeat(last_sequence: Option<u64>) -> Self {
        Self {
            d: Some(last_sequence.map_or(Value::Null, |s| Value::Number(s.into()))),
            ..Self::bare(OpCode::Heartbeat)
        }
    }

    /// Identify (op=2)
    pub fn identify(payload: &IdentifyPayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            d: Some(serde_json::to_value(payload)?),
            ..Self::bare(OpCode::Identify)
        })
    }

    /// Resume (op=6)
    pub fn resume(payload: &ResumePayload) -> Result<Self, serde_json::Error> {
        Ok(Self {
            d: Some(serde_json::to_value(payload)?),
            ..Self::bare(OpCode::Resume)
        })
    }

    /// Dispatch (op=0)
    #[must_use]
    pub fn dispatch(event_type: impl Into<String>, sequence: u64, data: Value) -> Self {
        Self {
            t: Some(event_type.into()),
            s: Some(sequence),
            d: Some(data),
            ..Self::bare(OpCode::Dispatch)
        }
    }

    /// Attach an event id to a dispatch
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Hello (op=10)
    #[must_use]
    pub fn hello(heartbeat_interval_ms: u64) -> Self {
        Self {
            d: Some(serde_json::json!({ "heartbeat_interval": heartbeat_interval_ms })),
            ..Self::bare(OpCode::Hello)
        }
    }

    /// Heartbeat ACK (op=11)
    #[must_use]
    pub fn heartbeat_ack() -> Self {
        Self::bare(OpCode::HeartbeatAck)
    }

    /// Reconnect (op=7)
    #[must_use]
    pub fn reconnect() -> Self {
        Self::bare(OpCode::Reconnect)
    }

    /// Invalid Session (op=9)
    #[must_use]
    pub fn invalid_session() -> Self {
        Self {
            d: Some(Value::Bool(false)),
            ..Self::bare(OpCode::InvalidSession)
        }
    }

    /// Decode `d` as `T` when the frame carries `op`
    fn payload<T: DeserializeOwned>(&self, op: OpCode) -> Option<T> {
        (self.op == op)
            .then_some(self.d.as_ref())
            .flatten()
            .and_then(|d| T::deserialize(d).ok())
    }

    pub fn as_hello(&self) -> Option<HelloPayload> {
        self.payload(OpCode::Hello)
    }

    pub fn as_identify(&self) -> Option<IdentifyPayload> {
        self.payload(OpCode::Identify)
    }

    pub fn as_resume(&self) -> Option<ResumePayload> {
        self.payload(OpCode::Resume)
    }

    /// Sequence carried by a heartbeat; the inner `None` is a `null` `d`
    pub fn as_heartbeat_seq(&self) -> Option<Option<u64>> {
        (self.op == OpCode::Heartbeat).then(|| self.d.as_ref().and_then(Value::as_u64))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

impl fmt::Display for GatewayMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op {}", self.op)?;
        match (&self.t, self.s) {
            (Some(t), Some(s)) => write!(f, " {t} #{s}"),
            (Some(t), None) => write!(f, " {t}"),
            _ => Ok(()),
        }
    }
}
