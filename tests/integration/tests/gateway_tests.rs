//! Gateway Integration Tests
//!
//! Drive the real client (pool, connections, dispatcher) against a scripted
//! mock gateway and check what it sends back.
//!
//! Run with: cargo test -p integration-tests --test gateway_tests

use std::collections::HashSet;
use std::time::Duration;

use integration_tests::{
    at_message, bot_authorization, hold_script, ready, resumed, test_settings, MockPlatform,
    PlatformConfig, RunningClient, Step,
};
use qqbot_common::{AppError, GatewaySettings};
use qqbot_gateway::events::GatewayEventType;
use qqbot_gateway::protocol::{GatewayMessage, OpCode};
use qqbot_gateway::BotEvent;
use serde_json::json;

fn hello() -> Step {
    Step::Send(GatewayMessage::hello(45_000))
}

// ============================================================================
// Handshake Tests
// ============================================================================

#[tokio::test]
async fn test_identify_then_resume_after_resumable_close() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(ready("sess-1", [0, 1], 1)),
            Step::Send(at_message("hello", 2)),
            Step::Close(4009),
        ]],
    )
    .await
    .unwrap();
    let mut client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    let first = platform.next_handshake().await.unwrap();
    assert_eq!(first.connection, 0);
    let identify = first.frame.as_identify().expect("identify");
    assert_eq!(identify.token, bot_authorization());
    assert_eq!(identify.shard, [0, 1]);
    assert_eq!(identify.intents, test_settings().intents.bits());

    let (ctx, event) = client.next_event().await.unwrap();
    assert_eq!(event.event_type(), GatewayEventType::Ready);
    assert_eq!(ctx.sequence, 1);

    let (ctx, event) = client.next_event().await.unwrap();
    assert_eq!(ctx.event_id.as_deref(), Some("AT_MESSAGE_CREATE:2"));
    assert_eq!(ctx.sequence, 2);
    assert_eq!(event.message().unwrap().plain_content(), "hello");

    let second = platform.next_handshake().await.unwrap();
    assert_eq!(second.connection, 1);
    let resume = second.frame.as_resume().expect("resume");
    assert_eq!(resume.session_id, "sess-1");
    assert_eq!(resume.seq, 2);
    assert_eq!(resume.token, bot_authorization());
}

#[tokio::test]
async fn test_invalid_session_forces_identify() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(ready("sess-1", [0, 1], 1)),
            Step::Send(GatewayMessage::invalid_session()),
            Step::Drain,
        ]],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    let first = platform.next_handshake().await.unwrap();
    assert_eq!(first.frame.op, OpCode::Identify);

    let second = platform.next_handshake().await.unwrap();
    assert_eq!(second.connection, 1);
    assert_eq!(second.frame.op, OpCode::Identify);
}

#[tokio::test]
async fn test_reconnect_directive_then_close_resumes() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(ready("sess-7", [0, 1], 3)),
            Step::Send(GatewayMessage::reconnect()),
            Step::Close(4009),
        ]],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    platform.next_handshake().await.unwrap();

    let second = platform.next_handshake().await.unwrap();
    let resume = second.frame.as_resume().expect("resume after reconnect");
    assert_eq!(resume.session_id, "sess-7");
    assert_eq!(resume.seq, 3);
}

#[tokio::test]
async fn test_invalid_session_close_code_forces_identify() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(ready("sess-1", [0, 1], 1)),
            Step::Send(at_message("one", 2)),
            Step::Close(4006),
        ]],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    platform.next_handshake().await.unwrap();

    let second = platform.next_handshake().await.unwrap();
    assert_eq!(second.connection, 1);
    assert_eq!(second.frame.op, OpCode::Identify);
}

#[tokio::test]
async fn test_resumed_session_keeps_dispatching() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![
            vec![
                hello(),
                Step::Recv,
                Step::Send(ready("sess-1", [0, 1], 1)),
                Step::Close(4009),
            ],
            vec![
                hello(),
                Step::Recv,
                Step::Send(resumed(2)),
                Step::Send(at_message("after resume", 3)),
                Step::Drain,
            ],
        ],
    )
    .await
    .unwrap();
    let mut client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    let mut sequences = Vec::new();
    let mut kinds = Vec::new();
    for _ in 0..3 {
        let (ctx, event) = client.next_event().await.unwrap();
        sequences.push(ctx.sequence);
        kinds.push(event.event_type());
    }

    assert_eq!(
        kinds,
        vec![
            GatewayEventType::Ready,
            GatewayEventType::Resumed,
            GatewayEventType::AtMessageCreate
        ]
    );
    assert!(sequences.windows(2).all(|w| w[0] <= w[1]));

    platform.next_handshake().await.unwrap();
    assert_eq!(platform.next_handshake().await.unwrap().frame.op, OpCode::Resume);
}

// ============================================================================
// Credential Tests
// ============================================================================

#[tokio::test]
async fn test_auth_failure_refetches_token() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![hello(), Step::Recv, Step::Close(4004)]],
    )
    .await
    .unwrap();
    let token = platform.secret_token().unwrap();
    let _client = RunningClient::spawn(&platform, token, test_settings()).unwrap();

    let first = platform.next_handshake().await.unwrap();
    assert_eq!(first.frame.as_identify().unwrap().token, "QQBot tok-1");

    let second = platform.next_handshake().await.unwrap();
    assert_eq!(second.frame.as_identify().unwrap().token, "QQBot tok-2");
    assert_eq!(platform.token_fetches(), 2);
}

// ============================================================================
// Heartbeat Tests
// ============================================================================

#[tokio::test]
async fn test_heartbeat_starts_after_ready_with_last_sequence() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            Step::Send(GatewayMessage::hello(100)),
            Step::Recv,
            Step::Sleep(Duration::from_millis(300)),
            Step::Send(ready("sess-1", [0, 1], 5)),
            Step::Recv,
            Step::Recv,
            Step::Drain,
        ]],
    )
    .await
    .unwrap();
    let settings = GatewaySettings {
        heartbeat_watchdog: false,
        ..test_settings()
    };
    let _client = RunningClient::spawn(&platform, platform.static_token(), settings).unwrap();

    assert_eq!(platform.next_frame().await.unwrap().frame.op, OpCode::Identify);

    for _ in 0..2 {
        let beat = platform.next_frame().await.unwrap();
        assert_eq!(beat.connection, 0);
        assert_eq!(beat.frame.as_heartbeat_seq(), Some(Some(5)));
    }
}

#[tokio::test]
async fn test_server_heartbeat_request_is_answered() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(GatewayMessage {
                d: None,
                ..GatewayMessage::heartbeat(None)
            }),
            Step::Recv,
            Step::Drain,
        ]],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    assert_eq!(platform.next_frame().await.unwrap().frame.op, OpCode::Identify);
    let beat = platform.next_frame().await.unwrap();
    assert_eq!(beat.frame.as_heartbeat_seq(), Some(None));
}

#[tokio::test]
async fn test_watchdog_drops_unacknowledged_connection() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            Step::Send(GatewayMessage::hello(100)),
            Step::Recv,
            Step::Send(ready("sess-1", [0, 1], 4)),
            Step::Drain,
        ]],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    platform.next_handshake().await.unwrap();

    // No ACK is ever sent, so the next connection resumes
    let second = platform.next_handshake().await.unwrap();
    assert_eq!(second.connection, 1);
    let resume = second.frame.as_resume().expect("resume after zombie");
    assert_eq!(resume.seq, 4);
}

#[tokio::test]
async fn test_slow_handler_does_not_trip_watchdog() {
    let mut script = vec![
        Step::Send(GatewayMessage::hello(100)),
        Step::Recv,
        Step::Send(ready("sess-1", [0, 1], 1)),
        Step::Send(at_message("one", 2)),
        Step::Send(at_message("two", 3)),
    ];
    for _ in 0..8 {
        script.push(Step::Recv);
        script.push(Step::Send(GatewayMessage::heartbeat_ack()));
    }
    script.push(Step::Drain);

    let mut platform = MockPlatform::start(PlatformConfig::default(), vec![script])
        .await
        .unwrap();
    let mut client = RunningClient::spawn_with_delay(
        &platform,
        platform.static_token(),
        test_settings(),
        Duration::from_millis(350),
    )
    .unwrap();

    platform.next_handshake().await.unwrap();

    // Eight ACKed beats span several handler calls
    for _ in 0..8 {
        let beat = platform.next_frame().await.unwrap();
        assert_eq!(beat.connection, 0);
        assert_eq!(beat.frame.op, OpCode::Heartbeat);
    }
    assert_eq!(platform.connections(), 1);

    let mut sequences = Vec::new();
    for _ in 0..3 {
        let (ctx, _) = client.next_event().await.unwrap();
        sequences.push(ctx.sequence);
    }
    assert_eq!(sequences, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_acknowledged_heartbeats_keep_connection() {
    let mut script = vec![
        Step::Send(GatewayMessage::hello(100)),
        Step::Recv,
        Step::Send(ready("sess-1", [0, 1], 1)),
    ];
    for _ in 0..4 {
        script.push(Step::Recv);
        script.push(Step::Send(GatewayMessage::heartbeat_ack()));
    }
    script.push(Step::Drain);

    let mut platform = MockPlatform::start(PlatformConfig::default(), vec![script])
        .await
        .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    platform.next_handshake().await.unwrap();
    for _ in 0..4 {
        let beat = platform.next_frame().await.unwrap();
        assert_eq!(beat.connection, 0);
        assert_eq!(beat.frame.op, OpCode::Heartbeat);
    }
    assert_eq!(platform.connections(), 1);
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[tokio::test]
async fn test_malformed_dispatch_ends_connection_resumably() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(ready("sess-1", [0, 1], 1)),
            Step::Send(GatewayMessage::dispatch("GUILD_CREATE", 2, json!("not a guild"))),
            Step::Drain,
        ]],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    platform.next_handshake().await.unwrap();

    let second = platform.next_handshake().await.unwrap();
    let resume = second.frame.as_resume().expect("resume after decode failure");
    assert_eq!(resume.seq, 2);
}

#[tokio::test]
async fn test_unknown_event_is_skipped() {
    let mut platform = MockPlatform::start(
        PlatformConfig::default(),
        vec![vec![
            hello(),
            Step::Recv,
            Step::Send(ready("sess-1", [0, 1], 1)),
            Step::Send(GatewayMessage::dispatch("GROUP_AT_MESSAGE_CREATE", 2, json!({}))),
            Step::Send(at_message("still here", 3)),
            Step::Drain,
        ]],
    )
    .await
    .unwrap();
    let mut client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    platform.next_handshake().await.unwrap();
    client.next_event().await.unwrap();

    let (ctx, event) = client.next_event().await.unwrap();
    assert_eq!(ctx.sequence, 3);
    assert!(matches!(event, BotEvent::AtMessageCreate(_)));
}

// ============================================================================
// Sharding Tests
// ============================================================================

#[tokio::test]
async fn test_every_shard_identifies() {
    let mut platform = MockPlatform::start(
        PlatformConfig {
            shards: 3,
            max_concurrency: 2,
            ..PlatformConfig::default()
        },
        vec![hold_script(), hold_script(), hold_script()],
    )
    .await
    .unwrap();
    let _client =
        RunningClient::spawn(&platform, platform.static_token(), test_settings()).unwrap();

    let mut shards = HashSet::new();
    for _ in 0..3 {
        let observed = platform.next_handshake().await.unwrap();
        shards.insert(observed.frame.as_identify().unwrap().shard);
    }
    assert_eq!(shards, HashSet::from([[0, 3], [1, 3], [2, 3]]));
}

#[tokio::test]
async fn test_bootstrap_capacity_error_is_fatal() {
    let platform = MockPlatform::start(
        PlatformConfig {
            shards: 4,
            remaining: 2,
            ..PlatformConfig::default()
        },
        vec![],
    )
    .await
    .unwrap();

    let api = platform.bot_api(platform.static_token()).unwrap();
    let client = qqbot_gateway::Client::new(
        std::sync::Arc::new(api),
        platform.static_token(),
        std::sync::Arc::new(qqbot_gateway::EventDispatcher::new(std::sync::Arc::new(
            qqbot_gateway::events::LoggingHandler,
        ))),
        test_settings(),
    );

    let err = client.run().await.unwrap_err();
    assert!(matches!(
        err,
        AppError::SessionLimitExceeded {
            shards: 4,
            remaining: 2
        }
    ));
    assert_eq!(platform.connections(), 0);
}
