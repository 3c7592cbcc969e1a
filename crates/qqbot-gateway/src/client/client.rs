//! Gateway client
//!
//! Bootstrap, size the pool, seed one Session per shard, and run.

use qqbot_api::GatewayBootstrap;
use qqbot_common::{AppError, GatewaySettings, Token};
use std::sync::Arc;
use tracing::info;

use super::ShardPlan;
use crate::connection::{ConnectionSettings, Session, ShardInfo};
use crate::events::EventDispatcher;
use crate::pool::{GatewayConnector, SessionPool};

/// Entry point that ties bootstrap, pool and connections together
pub struct Client {
    bootstrap: Arc<dyn GatewayBootstrap>,
    token: Arc<Token>,
    dispatcher: Arc<EventDispatcher>,
    settings: GatewaySettings,
}

impl Client {
    pub fn new(
        bootstrap: Arc<dyn GatewayBootstrap>,
        token: Arc<Token>,
        dispatcher: Arc<EventDispatcher>,
        settings: GatewaySettings,
    ) -> Self {
        Self {
            bootstrap,
            token,
            dispatcher,
            settings,
        }
    }

    /// Fetch bootstrap data and derive the shard plan
    pub async fn plan(&self) -> Result<ShardPlan, AppError> {
        let info = self.bootstrap.gateway_info().await?;
        ShardPlan::from_gateway_info(&info, self.settings.connect_window)
    }

    /// One fresh Session per shard
    pub fn sessions(&self, plan: &ShardPlan) -> Vec<Session> {
        (0..plan.shards)
            .map(|index| {
                Session::new(
                    plan.url.clone(),
                    ShardInfo::new(index, plan.shards),
                    self.settings.intents,
                    Arc::clone(&self.token),
                )
            })
            .collect()
    }

    /// Bootstrap and service every shard
    ///
    /// Only bootstrap failures are returned; connection failures are
    /// requeued, so in practice this runs until the process stops.
    pub async fn run(&self) -> Result<(), AppError> {
        let plan = self.plan().await?;
        info!(
            url = %plan.url,
            shards = plan.shards,
            max_concurrency = plan.max_concurrency,
            interval_ms = plan.interval.as_millis(),
            intents = %self.settings.intents,
            "Starting gateway client"
        );

        let pool = SessionPool::new(plan.max_concurrency).with_window(self.settings.connect_window);
        pool.seed(self.sessions(&plan));

        let connector = GatewayConnector::new(
            Arc::clone(&self.dispatcher),
            ConnectionSettings::from(&self.settings),
        );
        pool.run(plan.interval, Arc::new(connector)).await;
        Ok(())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("token", &self.token)
            .field("dispatcher", &self.dispatcher)
            .field("settings", &self.settings)
            .finish()
    }
}
