//! Per-shard session record
//!
//! A `Session` outlives every connection made for its shard. It is owned by
//! exactly one place at a time: the pool backlog, or the connection that is
//! currently driving it.

use qqbot_common::Token;
use qqbot_core::Intents;
use std::fmt;
use std::sync::Arc;

use crate::protocol::ReadyPayload;

/// Shard index and total shard count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShardInfo {
    pub index: u32,
    pub count: u32,
}

impl ShardInfo {
    #[must_use]
    pub const fn new(index: u32, count: u32) -> Self {
        Self { index, count }
    }

    /// `[index, count]` as sent in Identify
    #[must_use]
    pub const fn pair(self) -> [u32; 2] {
        [self.index, self.count]
    }
}

impl fmt::Display for ShardInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.index, self.count)
    }
}

/// Connection state for one shard
#[derive(Debug, Clone)]
pub struct Session {
    session_id: String,
    last_sequence: u64,
    shard: ShardInfo,
    intents: Intents,
    token: Arc<Token>,
    url: String,
}

impl Session {
    /// Fresh session that will Identify on its first connection
    pub fn new(url: impl Into<String>, shard: ShardInfo, intents: Intents, token: Arc<Token>) -> Self {
        Self {
            session_id: String::new(),
            last_sequence: 0,
            shard,
            intents,
            token,
            url: url.into(),
        }
    }

    #[inline]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[inline]
    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    #[inline]
    pub fn shard(&self) -> ShardInfo {
        self.shard
    }

    #[inline]
    pub fn intents(&self) -> Intents {
        self.intents
    }

    #[inline]
    pub fn token(&self) -> &Arc<Token> {
        &self.token
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// A non-empty session id means the next handshake is a Resume
    #[inline]
    pub fn can_resume(&self) -> bool {
        !self.session_id.is_empty()
    }

    /// Record a dispatch sequence number; never moves backwards
    ///
    /// Returns the sequence now stored.
    pub fn record_sequence(&mut self, seq: u64) -> u64 {
        if seq > self.last_sequence {
            self.last_sequence = seq;
        }
        self.last_sequence
    }

    /// Adopt the identity handed out by READY
    pub fn establish(&mut self, ready: &ReadyPayload) {
        self.session_id.clone_from(&ready.session_id);
        if let Some([index, count]) = ready.shard {
            self.shard = ShardInfo::new(index, count);
        }
    }

    /// Forget the session so the next handshake is an Identify
    ///
    /// Session id and sequence are only ever cleared together.
    pub fn reset(&mut self) {
        self.session_id.clear();
        self.last_sequence = 0;
    }
}
