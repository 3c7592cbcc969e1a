//! Bot configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use qqbot_core::Intents;
use std::env;
use std::time::Duration;

/// Production REST domain
pub const API_BASE_URL: &str = "https://api.sgroup.qq.com";
/// Sandbox REST domain
pub const SANDBOX_API_BASE_URL: &str = "https://sandbox.api.sgroup.qq.com";
/// App access token endpoint
pub const TOKEN_URL: &str = "https://bots.qq.com/app/getAppAccessToken";

/// Main bot configuration
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub app: AppSettings,
    pub credentials: Credentials,
    pub api: ApiSettings,
    pub gateway: GatewaySettings,
}

/// General application settings
#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Bot identity and secret material
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    /// App secret; selects the refreshing access-token mode
    pub secret: Option<String>,
    /// Legacy static bot token
    pub token: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("secret", &self.secret.as_ref().map(|_| "***"))
            .field("token", &self.token.as_ref().map(|_| "***"))
            .finish()
    }
}

/// REST collaborator settings
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub sandbox: bool,
    pub base_url: String,
    pub token_url: String,
    pub timeout: Duration,
}

/// Gateway and session-pool settings
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub intents: Intents,
    /// Used when Hello carries no heartbeat interval
    pub fallback_heartbeat: Duration,
    /// Drop the connection when a heartbeat goes un-ACKed for a full interval
    pub heartbeat_watchdog: bool,
    /// Rate-limit window the platform applies to connection starts
    pub connect_window: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            intents: Intents::default(),
            fallback_heartbeat: Duration::from_secs(default_fallback_heartbeat_secs()),
            heartbeat_watchdog: true,
            connect_window: Duration::from_secs(default_connect_window_secs()),
        }
    }
}

// Defaults
fn default_http_timeout_secs() -> u64 {
    5
}

fn default_fallback_heartbeat_secs() -> u64 {
    30
}

fn default_connect_window_secs() -> u64 {
    5
}

impl BotConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env is fine
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let app_id = var("QQBOT_APP_ID").ok_or(ConfigError::MissingVar("QQBOT_APP_ID"))?;
        let secret = var("QQBOT_SECRET");
        let token = var("QQBOT_TOKEN");
        if secret.is_none() && token.is_none() {
            return Err(ConfigError::MissingVar("QQBOT_SECRET or QQBOT_TOKEN"));
        }

        let sandbox = parse_bool(&var, "QQBOT_SANDBOX")?.unwrap_or(false);
        let base_url = var("QQBOT_API_BASE_URL").unwrap_or_else(|| {
            if sandbox {
                SANDBOX_API_BASE_URL.to_string()
            } else {
                API_BASE_URL.to_string()
            }
        });

        let intents = match var("QQBOT_INTENTS") {
            Some(raw) => raw
                .parse::<Intents>()
                .map_err(|e| ConfigError::InvalidValue("QQBOT_INTENTS", e.to_string()))?,
            None => Intents::default(),
        };

        Ok(Self {
            app: AppSettings {
                env: var("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            credentials: Credentials {
                app_id,
                secret,
                token,
            },
            api: ApiSettings {
                sandbox,
                base_url: base_url.trim_end_matches('/').to_string(),
                token_url: var("QQBOT_TOKEN_URL").unwrap_or_else(|| TOKEN_URL.to_string()),
                timeout: Duration::from_secs(
                    parse_num(&var, "QQBOT_HTTP_TIMEOUT_SECS")?
                        .unwrap_or_else(default_http_timeout_secs),
                ),
            },
            gateway: GatewaySettings {
                intents,
                fallback_heartbeat: Duration::from_secs(
                    parse_num(&var, "GATEWAY_FALLBACK_HEARTBEAT_SECS")?
                        .unwrap_or_else(default_fallback_heartbeat_secs),
                ),
                heartbeat_watchdog: parse_bool(&var, "GATEWAY_HEARTBEAT_WATCHDOG")?.unwrap_or(true),
                connect_window: Duration::from_secs(
                    parse_num(&var, "GATEWAY_CONNECT_WINDOW_SECS")?
                        .unwrap_or_else(default_connect_window_secs)
                        .max(1),
                ),
            },
        })
    }
}

fn parse_num<F>(var: &F, key: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidValue(key, raw))
        })
        .transpose()
}

fn parse_bool<F>(var: &F, key: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|raw| match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue(key, raw)),
        })
        .transpose()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
