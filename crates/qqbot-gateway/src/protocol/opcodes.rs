//! Gateway operation codes

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

macro_rules! op_codes {
    ($( $(#[$doc:meta])* $variant:ident = $value:literal; )*) => {
        /// Gateway operation codes
        ///
        /// The `op` field of every frame.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum OpCode {
            $( $(#[$doc])* $variant = $value, )*
        }

        impl OpCode {
            /// Parse a wire value
            #[must_use]
            pub fn from_u8(value: u8) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )*
                    _ => None,
                }
            }

            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )*
                }
            }
        }
    };
}

op_codes! {
    /// Event push carrying `t`, `s` and `d`
    Dispatch = 0;
    /// Keepalive carrying the last sequence; the server may also request one
    Heartbeat = 1;
    /// Start a fresh session
    Identify = 2;
    /// Continue a dropped session from a sequence
    Resume = 6;
    /// Server asks for a reconnect; the session stays resumable
    Reconnect = 7;
    /// Identify or Resume rejected
    InvalidSession = 9;
    /// First frame after the socket opens, carries the heartbeat interval
    Hello = 10;
    HeartbeatAck = 11;
}

impl OpCode {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Serialize for OpCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

impl<'de> Deserialize<'de> for OpCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u8::deserialize(deserializer)?;
        Self::from_u8(value)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown op code {value}")))
    }
}

impl fmt::Display for OpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u8())
    }
}
