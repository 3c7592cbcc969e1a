//! Gateway connections
//!
//! The Session record, the per-shard protocol engine and its heartbeat, and
//! the rules that decide how a Session is requeued after a disconnect.

mod connection;
mod disconnect;
mod error;
mod forwarder;
mod heartbeat;
mod session;

pub use connection::{handshake_frame, Connection, ConnectionSettings, ConnectionState};
pub use disconnect::{classify, Disconnect, DisconnectPlan};
pub use error::ConnectionError;
pub use heartbeat::HeartbeatState;
pub use session::{Session, ShardInfo};
