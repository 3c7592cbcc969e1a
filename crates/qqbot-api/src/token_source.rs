//! App-secret → access-token exchange

use async_trait::async_trait;
use qqbot_common::{AccessToken, AccessTokenSource, AppError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::http::handle_response;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AccessTokenRequest<'a> {
    app_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
struct AccessTokenResponse {
    access_token: String,
    /// Seconds; sent as a string by the platform
    #[serde(deserialize_with = "seconds")]
    expires_in: i64,
}

fn seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Fetches access tokens from the platform's token endpoint
#[derive(Debug, Clone)]
pub struct AppAccessTokenClient {
    client: Client,
    url: String,
}

impl AppAccessTokenClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::http)?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl AccessTokenSource for AppAccessTokenClient {
    async fn fetch(&self, app_id: &str, secret: &str) -> Result<AccessToken, AppError> {
        debug!(app_id = %app_id, url = %self.url, "Fetching app access token");

        let response = self
            .client
            .post(&self.url)
            .json(&AccessTokenRequest {
                app_id,
                client_secret: secret,
            })
            .send()
            .await
            .map_err(|e| AppError::TokenRefresh(e.to_string()))?;

        let body: AccessTokenResponse = handle_response(&self.url, response)
            .await
            .map_err(|e| AppError::TokenRefresh(e.to_string()))?;

        Ok(AccessToken::new(body.access_token, body.expires_in))
    }
}
