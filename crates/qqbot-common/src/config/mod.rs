//! Configuration structs

mod app_config;

pub use app_config::{
    ApiSettings, AppSettings, BotConfig, ConfigError, Credentials, Environment, GatewaySettings,
};
