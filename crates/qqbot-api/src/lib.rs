//! # qqbot-api
//!
//! The slice of the platform's REST API the gateway depends on: the
//! `/gateway/bot` bootstrap call and the app-secret → access-token exchange.

pub mod error;
pub mod gateway;
pub mod http;
pub mod token_source;

pub use error::{ApiError, ApiErrorKind};
pub use gateway::{BotApi, GatewayBootstrap, GatewayInfo, SessionStartLimit};
pub use http::{BotHttp, Route, X_TPS_TRACE_ID};
pub use token_source::AppAccessTokenClient;
