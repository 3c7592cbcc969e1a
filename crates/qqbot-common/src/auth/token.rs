//! Bot credential lifecycle
//!
//! Two modes are supported. A legacy static bot token never changes and is sent
//! as `Bot {app_id}.{token}`. An app secret is exchanged for a short-lived access
//! token that is sent as `QQBot {access_token}` and refreshed shortly before it
//! expires, or right away after it has been invalidated.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::AppError;

/// Refresh this long before the platform-reported expiry
const REFRESH_MARGIN_SECS: i64 = 60;

/// A fetched access token
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessToken {
    /// Create a token that expires `expires_in_secs` from now
    #[must_use]
    pub fn new(value: impl Into<String>, expires_in_secs: i64) -> Self {
        Self {
            value: value.into(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        }
    }

    /// Check whether the token is expired or about to expire
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        Utc::now() + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Exchanges an app secret for an access token
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn fetch(&self, app_id: &str, secret: &str) -> Result<AccessToken, AppError>;
}

/// Which credential scheme a [`Token`] uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    /// `Bot {app_id}.{token}`
    Static,
    /// `QQBot {access_token}`
    AccessToken,
}

enum Credential {
    Static(String),
    Secret {
        secret: String,
        source: Arc<dyn AccessTokenSource>,
        cache: RwLock<Option<AccessToken>>,
        refresh_lock: Mutex<()>,
    },
}

/// Credential handle shared by the REST client and every gateway session
pub struct Token {
    app_id: String,
    credential: Credential,
}

impl Token {
    /// Static bot token
    #[must_use]
    pub fn bot(app_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            credential: Credential::Static(token.into()),
        }
    }

    /// App secret exchanged for access tokens through `source`
    #[must_use]
    pub fn with_secret(
        app_id: impl Into<String>,
        secret: impl Into<String>,
        source: Arc<dyn AccessTokenSource>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            credential: Credential::Secret {
                secret: secret.into(),
                source,
                cache: RwLock::new(None),
                refresh_lock: Mutex::new(()),
            },
        }
    }

    #[inline]
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn mode(&self) -> TokenMode {
        match self.credential {
            Credential::Static(_) => TokenMode::Static,
            Credential::Secret { .. } => TokenMode::AccessToken,
        }
    }

    /// Make sure a usable credential is cached, refreshing if needed
    ///
    /// Concurrent callers wait on a single refresh instead of each fetching.
    pub async fn check(&self) -> Result<(), AppError> {
        let Credential::Secret {
            secret,
            source,
            cache,
            refresh_lock,
        } = &self.credential
        else {
            return Ok(());
        };

        if Self::is_fresh(cache) {
            return Ok(());
        }

        let _guard = refresh_lock.lock().await;
        // Another caller may have refreshed while we waited
        if Self::is_fresh(cache) {
            return Ok(());
        }

        let token = source.fetch(&self.app_id, secret).await?;
        tracing::info!(
            app_id = %self.app_id,
            expires_at = %token.expires_at,
            "Access token refreshed"
        );
        *cache.write() = Some(token);
        Ok(())
    }

    fn is_fresh(cache: &RwLock<Option<AccessToken>>) -> bool {
        cache.read().as_ref().is_some_and(|t| !t.needs_refresh())
    }

    /// Authorization string for the current credential, if one is cached
    ///
    /// Used both as the HTTP `Authorization` header and as the Identify token.
    pub fn authorization(&self) -> Option<String> {
        match &self.credential {
            Credential::Static(token) => Some(format!("Bot {}.{}", self.app_id, token)),
            Credential::Secret { cache, .. } => cache
                .read()
                .as_ref()
                .map(|t| format!("QQBot {}", t.value)),
        }
    }

    /// Refresh if needed, then return the authorization string
    pub async fn authorize(&self) -> Result<String, AppError> {
        self.check().await?;
        self.authorization().ok_or_else(|| {
            AppError::AuthenticationFailed("no access token available".to_string())
        })
    }

    /// Drop the cached access token so the next `check` fetches a new one
    pub fn invalidate(&self) {
        match &self.credential {
            Credential::Static(_) => {
                tracing::warn!(app_id = %self.app_id, "Static bot token rejected; it cannot be refreshed");
            }
            Credential::Secret { cache, .. } => {
                *cache.write() = None;
                tracing::info!(app_id = %self.app_id, "Access token invalidated");
            }
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("app_id", &self.app_id)
            .field("mode", &self.mode())
            .finish()
    }
}
