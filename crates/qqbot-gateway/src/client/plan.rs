//! Shard plan derived from the gateway bootstrap

use qqbot_api::GatewayInfo;
use qqbot_common::AppError;
use std::time::Duration;

use crate::pool::start_interval;

/// Where to connect, how many shards, and how fast to start them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardPlan {
    pub url: String,
    pub shards: u32,
    pub max_concurrency: u32,
    /// Delay between connection batches
    pub interval: Duration,
}

impl ShardPlan {
    /// Size the pool from bootstrap data
    ///
    /// Requesting more shards than the platform has session starts left is
    /// fatal: every shard would be refused.
    pub fn from_gateway_info(info: &GatewayInfo, window: Duration) -> Result<Self, AppError> {
        let limit = &info.session_start_limit;
        let shards = info.shards.max(1);

        if shards > limit.remaining {
            return Err(AppError::SessionLimitExceeded {
                shards,
                remaining: limit.remaining,
            });
        }

        let max_concurrency = limit.max_concurrency.max(1);
        Ok(Self {
            url: info.url.clone(),
            shards,
            max_concurrency,
            interval: start_interval(window, max_concurrency),
        })
    }
}
