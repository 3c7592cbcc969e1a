//! Disconnect classification
//!
//! Decides what happens to a Session once its connection has ended. The
//! connection never reconnects by itself; it applies the plan and hands the
//! Session back to the pool.

use std::fmt;

use super::ConnectionError;
use crate::protocol::CloseCode;

/// Why a connection ended
#[derive(Debug)]
pub enum Disconnect {
    /// The server closed the socket, with its close code if it sent one
    Closed(Option<u16>),
    /// op=9 received
    InvalidSession,
    /// A heartbeat went un-ACKed for a full interval
    HeartbeatTimeout,
    /// Transport or protocol failure on our side of the socket
    Error(ConnectionError),
}

impl Disconnect {
    /// Close code carried by the disconnect, if any
    pub fn close_code(&self) -> Option<u16> {
        match self {
            Self::Closed(code) => *code,
            _ => None,
        }
    }
}

impl fmt::Display for Disconnect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed(Some(code)) => match CloseCode::from_u16(*code) {
                Some(known) => write!(f, "closed with {code} ({})", known.description()),
                None => write!(f, "closed with {code}"),
            },
            Self::Closed(None) => f.write_str("closed without a close code"),
            Self::InvalidSession => f.write_str("invalid session"),
            Self::HeartbeatTimeout => f.write_str("heartbeat not acknowledged"),
            Self::Error(e) => write!(f, "{e}"),
        }
    }
}

/// What to do with the Session before it is requeued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisconnectPlan {
    /// Clear session id and sequence so the next handshake is an Identify
    pub reset_session: bool,
    /// Drop the cached credential so it is fetched again before reconnecting
    pub invalidate_token: bool,
}

impl DisconnectPlan {
    /// Next handshake can be a Resume
    #[inline]
    pub fn is_resumable(self) -> bool {
        !self.reset_session
    }
}

/// Classify a disconnect
///
/// `can_reconnect` is the connection's resumability flag: cleared by op=9,
/// set again by op=7.
pub fn classify(disconnect: &Disconnect, can_reconnect: bool) -> DisconnectPlan {
    let code = disconnect.close_code().and_then(CloseCode::from_u16);

    DisconnectPlan {
        reset_session: !can_reconnect
            || code.is_some_and(CloseCode::requires_identify)
            || matches!(disconnect, Disconnect::InvalidSession),
        invalidate_token: code.is_some_and(CloseCode::invalidates_token),
    }
}
