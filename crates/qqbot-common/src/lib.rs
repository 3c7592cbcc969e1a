//! # qqbot-common
//!
//! Shared utilities including configuration, error handling, the bot credential
//! lifecycle, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{AccessToken, AccessTokenSource, Token, TokenMode};
pub use config::{
    ApiSettings, AppSettings, BotConfig, ConfigError, Credentials, Environment, GatewaySettings,
};
pub use error::{AppError, AppResult};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
