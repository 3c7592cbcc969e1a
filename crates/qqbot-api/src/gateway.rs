//! Gateway bootstrap: where to connect and how fast

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::http::{BotHttp, Route};

/// Platform limits on starting new gateway sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStartLimit {
    pub total: u32,
    pub remaining: u32,
    /// Milliseconds until `remaining` resets
    #[serde(default)]
    pub reset_after: u64,
    pub max_concurrency: u32,
}

/// Response of `GET /gateway/bot`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayInfo {
    pub url: String,
    pub shards: u32,
    pub session_start_limit: SessionStartLimit,
}

/// Source of gateway connection parameters
#[async_trait]
pub trait GatewayBootstrap: Send + Sync {
    async fn gateway_info(&self) -> Result<GatewayInfo, ApiError>;
}

/// The REST calls the gateway client needs
#[derive(Debug, Clone)]
pub struct BotApi {
    http: BotHttp,
}

impl BotApi {
    pub fn new(http: BotHttp) -> Self {
        Self { http }
    }

    #[inline]
    pub fn http(&self) -> &BotHttp {
        &self.http
    }

    /// `GET /gateway/bot`
    pub async fn gateway_bot(&self) -> Result<GatewayInfo, ApiError> {
        let info: GatewayInfo = self.http.get(&Route::get("/gateway/bot")).await?;
        info!(
            url = %info.url,
            shards = info.shards,
            total = info.session_start_limit.total,
            remaining = info.session_start_limit.remaining,
            max_concurrency = info.session_start_limit.max_concurrency,
            "Gateway bootstrap fetched"
        );
        Ok(info)
    }
}

#[async_trait]
impl GatewayBootstrap for BotApi {
    async fn gateway_info(&self) -> Result<GatewayInfo, ApiError> {
        self.gateway_bot().await
    }
}
