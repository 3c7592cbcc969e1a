//! Gateway events
//!
//! Event names, decoded event values, and the dispatcher that connects them.

mod dispatcher;
mod event_types;
mod payloads;
mod sinks;

pub use dispatcher::{DecodeFn, DispatchError, EventDispatcher, EventHandler, PlainEventHandler};
pub use event_types::GatewayEventType;
pub use payloads::{BotEvent, EventContext, RawEvent};
pub use sinks::{ChannelSink, LoggingHandler};
