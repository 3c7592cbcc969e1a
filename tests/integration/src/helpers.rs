//! Test helpers for integration tests
//!
//! Provides the mock platform server and utilities for running the gateway
//! client against it.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use qqbot_api::{AppAccessTokenClient, BotApi, BotHttp};
use qqbot_common::{AppError, GatewaySettings, Token};
use qqbot_gateway::events::ChannelSink;
use qqbot_gateway::protocol::{GatewayMessage, OpCode};
use qqbot_gateway::{BotEvent, Client, EventContext, EventDispatcher, EventHandler};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::fixtures::{APP_ID, APP_SECRET, BOT_TOKEN, TRACE_ID};

/// How long a test waits for any single frame or event
const WAIT: Duration = Duration::from_secs(5);

/// One step of a scripted gateway connection
#[derive(Debug, Clone)]
pub enum Step {
    /// Send a frame to the client
    Send(GatewayMessage),
    /// Wait for the next frame from the client and record it
    Recv,
    Sleep(Duration),
    /// Close the socket with a code
    Close(u16),
    /// Record frames until the client hangs up
    Drain,
}

/// Script used once the queued scripts run out: Hello, record the handshake, hold
pub fn hold_script() -> Vec<Step> {
    vec![
        Step::Send(GatewayMessage::hello(45_000)),
        Step::Recv,
        Step::Drain,
    ]
}

/// Bootstrap values served by the mock `/gateway/bot`
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub shards: u32,
    pub remaining: u32,
    pub max_concurrency: u32,
    /// Status returned by `/gateway/bot`
    pub gateway_status: StatusCode,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            shards: 1,
            remaining: 1000,
            max_concurrency: 1,
            gateway_status: StatusCode::OK,
        }
    }
}

/// A frame the client sent, tagged with the connection it arrived on
#[derive(Debug, Clone)]
pub struct Observed {
    /// Zero-based index of the WebSocket connection
    pub connection: usize,
    pub frame: GatewayMessage,
}

/// Headers seen on a REST request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestHeaders {
    pub authorization: String,
    pub app_id: String,
}

struct MockState {
    config: PlatformConfig,
    ws_url: String,
    scripts: Mutex<VecDeque<Vec<Step>>>,
    connections: AtomicUsize,
    observed: mpsc::UnboundedSender<Observed>,
    token_fetches: AtomicUsize,
    rest_headers: Mutex<Vec<RestHeaders>>,
}

/// In-process mock of the bot platform
pub struct MockPlatform {
    pub addr: SocketAddr,
    state: Arc<MockState>,
    observed: mpsc::UnboundedReceiver<Observed>,
    _handle: JoinHandle<()>,
}

impl MockPlatform {
    /// Start a mock platform; connection `n` runs `scripts[n]`
    pub async fn start(config: PlatformConfig, scripts: Vec<Vec<Step>>) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let (tx, observed) = mpsc::unbounded_channel();

        let state = Arc::new(MockState {
            config,
            ws_url: format!("ws://{addr}/websocket"),
            scripts: Mutex::new(scripts.into()),
            connections: AtomicUsize::new(0),
            observed: tx,
            token_fetches: AtomicUsize::new(0),
            rest_headers: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/gateway/bot", get(gateway_bot))
            .route("/app/getAppAccessToken", post(access_token))
            .route("/websocket", get(websocket))
            .with_state(Arc::clone(&state));

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            observed,
            _handle: handle,
        })
    }

    /// Get base URL for the REST routes
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn token_url(&self) -> String {
        format!("{}/app/getAppAccessToken", self.base_url())
    }

    pub fn ws_url(&self) -> &str {
        &self.state.ws_url
    }

    /// Number of access tokens handed out
    pub fn token_fetches(&self) -> usize {
        self.state.token_fetches.load(Ordering::SeqCst)
    }

    /// Number of WebSocket connections accepted
    pub fn connections(&self) -> usize {
        self.state.connections.load(Ordering::SeqCst)
    }

    pub fn rest_headers(&self) -> Vec<RestHeaders> {
        self.state.rest_headers.lock().clone()
    }

    /// Next frame recorded from any connection
    pub async fn next_frame(&mut self) -> Result<Observed> {
        tokio::time::timeout(WAIT, self.observed.recv())
            .await
            .context("timed out waiting for a client frame")?
            .context("mock platform stopped")
    }

    /// Next frame that is not a heartbeat
    pub async fn next_handshake(&mut self) -> Result<Observed> {
        loop {
            let observed = self.next_frame().await?;
            if observed.frame.op != OpCode::Heartbeat {
                return Ok(observed);
            }
        }
    }

    /// REST client authorized with `token`
    pub fn bot_api(&self, token: Arc<Token>) -> Result<BotApi> {
        let client = reqwest::Client::builder().timeout(WAIT).build()?;
        Ok(BotApi::new(BotHttp::with_client(
            client,
            self.base_url(),
            token,
        )))
    }

    /// Static bot token
    pub fn static_token(&self) -> Arc<Token> {
        Arc::new(Token::bot(APP_ID, BOT_TOKEN))
    }

    /// App-secret token backed by the mock token endpoint
    pub fn secret_token(&self) -> Result<Arc<Token>> {
        let source = AppAccessTokenClient::new(self.token_url(), WAIT)?;
        Ok(Arc::new(Token::with_secret(
            APP_ID,
            APP_SECRET,
            Arc::new(source),
        )))
    }
}

async fn gateway_bot(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string()
    };
    state.rest_headers.lock().push(RestHeaders {
        authorization: header("authorization"),
        app_id: header("x-union-appid"),
    });

    let config = &state.config;
    if config.gateway_status != StatusCode::OK {
        return (
            config.gateway_status,
            [("X-Tps-trace-Id", TRACE_ID)],
            Json(json!({"code": 11241, "message": "token invalid"})),
        )
            .into_response();
    }

    Json(json!({
        "url": state.ws_url,
        "shards": config.shards,
        "session_start_limit": {
            "total": 1000,
            "remaining": config.remaining,
            "reset_after": 86_400_000,
            "max_concurrency": config.max_concurrency,
        },
    }))
    .into_response()
}

async fn access_token(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    if body["appId"] != APP_ID || body["clientSecret"] != APP_SECRET {
        return (StatusCode::UNAUTHORIZED, Json(json!({"message": "bad secret"}))).into_response();
    }

    let n = state.token_fetches.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({"access_token": format!("tok-{n}"), "expires_in": "7200"})).into_response()
}

async fn websocket(State(state): State<Arc<MockState>>, ws: WebSocketUpgrade) -> Response {
    let index = state.connections.fetch_add(1, Ordering::SeqCst);
    let script = state.scripts.lock().pop_front().unwrap_or_else(hold_script);
    ws.on_upgrade(move |socket| run_script(state, index, socket, script))
}

async fn run_script(state: Arc<MockState>, index: usize, mut socket: WebSocket, script: Vec<Step>) {
    for step in script {
        match step {
            Step::Send(frame) => {
                let Ok(json) = frame.to_json() else { return };
                if socket.send(Message::Text(json)).await.is_err() {
                    return;
                }
            }
            Step::Recv => {
                if !record_next(&state, index, &mut socket).await {
                    return;
                }
            }
            Step::Sleep(duration) => tokio::time::sleep(duration).await,
            Step::Close(code) => {
                let frame = CloseFrame {
                    code,
                    reason: Cow::Borrowed(""),
                };
                let _ = socket.send(Message::Close(Some(frame))).await;
                return;
            }
            Step::Drain => {
                while record_next(&state, index, &mut socket).await {}
                return;
            }
        }
    }
}

/// Record the next text frame; false once the socket is gone
async fn record_next(state: &MockState, index: usize, socket: &mut WebSocket) -> bool {
    while let Some(Ok(message)) = socket.recv().await {
        match message {
            Message::Text(text) => {
                if let Ok(frame) = GatewayMessage::from_json(&text) {
                    let _ = state.observed.send(Observed {
                        connection: index,
                        frame,
                    });
                }
                return true;
            }
            Message::Close(_) => return false,
            _ => {}
        }
    }
    false
}

/// Gateway settings with a short start window so tests reconnect quickly
pub fn test_settings() -> GatewaySettings {
    GatewaySettings {
        connect_window: Duration::from_millis(200),
        ..GatewaySettings::default()
    }
}

/// A gateway client running in the background
/// Handler that takes `delay` over every event before passing it on
#[derive(Debug)]
pub struct SlowSink {
    delay: Duration,
    inner: ChannelSink,
}

#[async_trait]
impl EventHandler for SlowSink {
    async fn on_event(&self, ctx: EventContext, event: BotEvent) {
        tokio::time::sleep(self.delay).await;
        self.inner.on_event(ctx, event).await;
    }
}

pub struct RunningClient {
    events: mpsc::UnboundedReceiver<(EventContext, BotEvent)>,
    handle: JoinHandle<Result<(), AppError>>,
}

impl RunningClient {
    /// Start a client against the mock platform, collecting events
    pub fn spawn(platform: &MockPlatform, token: Arc<Token>, settings: GatewaySettings) -> Result<Self> {
        Self::spawn_with_delay(platform, token, settings, Duration::ZERO)
    }

    /// Like [`RunningClient::spawn`], with a handler that takes `delay` per event
    pub fn spawn_with_delay(
        platform: &MockPlatform,
        token: Arc<Token>,
        settings: GatewaySettings,
        delay: Duration,
    ) -> Result<Self> {
        let (sink, events) = ChannelSink::new();
        let handler: Arc<dyn EventHandler> = if delay.is_zero() {
            Arc::new(sink)
        } else {
            Arc::new(SlowSink { delay, inner: sink })
        };
        let dispatcher = EventDispatcher::with_default_decoders(handler);
        let client = Client::new(
            Arc::new(platform.bot_api(Arc::clone(&token))?),
            token,
            Arc::new(dispatcher),
            settings,
        );

        let handle = tokio::spawn(async move { client.run().await });
        Ok(Self { events, handle })
    }

    /// Next decoded event
    pub async fn next_event(&mut self) -> Result<(EventContext, BotEvent)> {
        tokio::time::timeout(WAIT, self.events.recv())
            .await
            .context("timed out waiting for an event")?
            .context("client stopped")
    }
}

impl Drop for RunningClient {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
