//! Gateway close codes
//!
//! Codes the platform puts in the close frame when it ends a connection.
//! Anything not listed here is treated as resumable.

use std::fmt;

/// What a reconnect has to do differently after a close code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// Resume with the cached session
    Resume,
    /// Drop the session and send a fresh Identify
    Identify,
    /// Fetch a new credential before the next handshake
    RefreshToken,
    /// The bot's setup is wrong; reconnects keep failing until an operator steps in
    Misconfigured,
}

macro_rules! close_codes {
    ($( $variant:ident = $value:literal, $recovery:ident, $description:literal; )*) => {
        /// Platform-defined WebSocket close codes
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum CloseCode {
            $( #[doc = $description] $variant = $value, )*
        }

        impl CloseCode {
            #[must_use]
            pub fn from_u16(value: u16) -> Option<Self> {
                match value {
                    $( $value => Some(Self::$variant), )*
                    _ => None,
                }
            }

            #[must_use]
            pub const fn recovery(self) -> Recovery {
                match self {
                    $( Self::$variant => Recovery::$recovery, )*
                }
            }

            #[must_use]
            pub const fn description(self) -> &'static str {
                match self {
                    $( Self::$variant => $description, )*
                }
            }
        }
    };
}

close_codes! {
    UnknownOpcode = 4001, Resume, "Invalid opcode sent";
    DecodeError = 4002, Resume, "Invalid payload encoding";
    AuthenticationFailed = 4004, RefreshToken, "Authentication failed";
    InvalidSession = 4006, Identify, "Invalid session id";
    InvalidSequence = 4007, Identify, "Invalid sequence number";
    RateLimited = 4008, Resume, "Rate limited";
    SessionTimeout = 4009, Resume, "Session timeout";
    InvalidShard = 4010, Misconfigured, "Invalid shard";
    ShardingRequired = 4011, Misconfigured, "Sharding required";
    InvalidVersion = 4012, Misconfigured, "Invalid gateway version";
    InvalidIntents = 4013, Misconfigured, "Invalid intents";
    DisallowedIntents = 4014, Misconfigured, "Intents not permitted";
    SessionReset = 9001, Identify, "Session reset by server";
    SessionExpired = 9005, Identify, "Session expired";
}

impl CloseCode {
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Session state is unusable; the next handshake must be an Identify
    #[must_use]
    pub fn requires_identify(self) -> bool {
        self.recovery() == Recovery::Identify
    }

    /// The cached credential was rejected
    #[must_use]
    pub fn invalidates_token(self) -> bool {
        self.recovery() == Recovery::RefreshToken
    }

    #[must_use]
    pub fn is_configuration_error(self) -> bool {
        self.recovery() == Recovery::Misconfigured
    }
}

impl fmt::Display for CloseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_u16())
    }
}

impl From<CloseCode> for u16 {
    fn from(code: CloseCode) -> Self {
        code.as_u16()
    }
}
