//! Starting a connection for a Session

use async_trait::async_trait;
use std::sync::Arc;

use super::SessionQueue;
use crate::connection::{Connection, ConnectionSettings, Session};
use crate::events::EventDispatcher;

/// Runs one connection attempt for a Session
///
/// Implementations must hand the Session back through `queue` when the
/// attempt ends.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, session: Session, queue: SessionQueue);
}

/// Connector that drives a real gateway [`Connection`]
#[derive(Debug, Clone)]
pub struct GatewayConnector {
    dispatcher: Arc<EventDispatcher>,
    settings: ConnectionSettings,
}

impl GatewayConnector {
    pub fn new(dispatcher: Arc<EventDispatcher>, settings: ConnectionSettings) -> Self {
        Self {
            dispatcher,
            settings,
        }
    }
}

#[async_trait]
impl Connector for GatewayConnector {
    async fn connect(&self, session: Session, queue: SessionQueue) {
        Connection::new(session, Arc::clone(&self.dispatcher), queue, self.settings)
            .run()
            .await;
    }
}
