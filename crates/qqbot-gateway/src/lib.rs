//! # qqbot-gateway
//!
//! Sharded gateway client: protocol codec, per-shard connections with
//! heartbeat and resume, the rate-limited session pool, and the event
//! dispatcher that turns dispatch frames into typed events.

pub mod client;
pub mod connection;
pub mod events;
pub mod pool;
pub mod protocol;

pub use client::{run, Client, ShardPlan};
pub use connection::{Connection, ConnectionError, Session, ShardInfo};
pub use events::{BotEvent, EventContext, EventDispatcher, EventHandler, PlainEventHandler};
pub use pool::{SessionPool, SessionQueue};
