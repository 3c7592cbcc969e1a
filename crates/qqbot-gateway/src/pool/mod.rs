//! Session pool
//!
//! Rate-limited scheduling of connection attempts and the requeue path that
//! brings disconnected Sessions back.

mod connector;
mod pool;
mod queue;
mod window;

pub use connector::{Connector, GatewayConnector};
pub use pool::{start_interval, SessionPool, DEFAULT_WINDOW};
pub use queue::SessionQueue;
