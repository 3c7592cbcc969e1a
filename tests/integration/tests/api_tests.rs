//! REST Integration Tests
//!
//! Bootstrap and access-token calls against the in-process mock platform.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use axum::http::StatusCode;
use integration_tests::{bot_authorization, MockPlatform, PlatformConfig, APP_ID, TRACE_ID};
use qqbot_api::{ApiError, ApiErrorKind, GatewayBootstrap};
use qqbot_common::{AppError, TokenMode};

// ============================================================================
// Gateway Bootstrap Tests
// ============================================================================

#[tokio::test]
async fn test_gateway_bot_returns_limits() {
    let platform = MockPlatform::start(
        PlatformConfig {
            shards: 4,
            remaining: 900,
            max_concurrency: 2,
            ..PlatformConfig::default()
        },
        vec![],
    )
    .await
    .unwrap();
    let api = platform.bot_api(platform.static_token()).unwrap();

    let info = api.gateway_info().await.unwrap();

    assert_eq!(info.url, platform.ws_url());
    assert_eq!(info.shards, 4);
    assert_eq!(info.session_start_limit.remaining, 900);
    assert_eq!(info.session_start_limit.max_concurrency, 2);
}

#[tokio::test]
async fn test_gateway_bot_sends_credentials() {
    let platform = MockPlatform::start(PlatformConfig::default(), vec![])
        .await
        .unwrap();
    let api = platform.bot_api(platform.static_token()).unwrap();

    api.gateway_bot().await.unwrap();

    let headers = platform.rest_headers();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].authorization, bot_authorization());
    assert_eq!(headers[0].app_id, APP_ID);
}

#[tokio::test]
async fn test_gateway_bot_error_status() {
    let platform = MockPlatform::start(
        PlatformConfig {
            gateway_status: StatusCode::UNAUTHORIZED,
            ..PlatformConfig::default()
        },
        vec![],
    )
    .await
    .unwrap();
    let api = platform.bot_api(platform.static_token()).unwrap();

    let err = api.gateway_bot().await.unwrap_err();

    assert_eq!(err.kind(), Some(ApiErrorKind::AuthenticationFailed));
    let ApiError::Status {
        message, trace_id, ..
    } = &err
    else {
        panic!("expected a status error, got {err:?}");
    };
    assert_eq!(message, "token invalid");
    assert_eq!(trace_id.as_deref(), Some(TRACE_ID));

    assert!(matches!(AppError::from(err), AppError::AuthenticationFailed(_)));
}

#[tokio::test]
async fn test_server_error_is_server_kind() {
    let platform = MockPlatform::start(
        PlatformConfig {
            gateway_status: StatusCode::GATEWAY_TIMEOUT,
            ..PlatformConfig::default()
        },
        vec![],
    )
    .await
    .unwrap();
    let api = platform.bot_api(platform.static_token()).unwrap();

    let err = api.gateway_bot().await.unwrap_err();
    assert_eq!(err.kind(), Some(ApiErrorKind::Server));
}

// ============================================================================
// Access Token Tests
// ============================================================================

#[tokio::test]
async fn test_secret_mode_fetches_access_token() {
    let platform = MockPlatform::start(PlatformConfig::default(), vec![])
        .await
        .unwrap();
    let token = platform.secret_token().unwrap();
    assert_eq!(token.mode(), TokenMode::AccessToken);

    let api = platform.bot_api(token.clone()).unwrap();
    api.gateway_bot().await.unwrap();
    api.gateway_bot().await.unwrap();

    assert_eq!(platform.token_fetches(), 1);
    let headers = platform.rest_headers();
    assert!(headers.iter().all(|h| h.authorization == "QQBot tok-1"));
}

#[tokio::test]
async fn test_invalidated_token_is_refetched() {
    let platform = MockPlatform::start(PlatformConfig::default(), vec![])
        .await
        .unwrap();
    let token = platform.secret_token().unwrap();

    assert_eq!(token.authorize().await.unwrap(), "QQBot tok-1");
    token.invalidate();
    assert_eq!(token.authorize().await.unwrap(), "QQBot tok-2");
    assert_eq!(platform.token_fetches(), 2);
}
