//! Per-shard protocol engine
//!
//! One `Connection` owns one WebSocket for the lifetime of a single attempt.
//! It performs the handshake, forwards dispatches, runs the heartbeat, and on
//! any disconnect classifies the cause, fixes up the Session and requeues it.
//! Event handlers run on the connection's forwarder task, never on the loop
//! that reads the socket.

use futures_util::{SinkExt, StreamExt};
use qqbot_common::GatewaySettings;
use serde::Deserialize;
use serde_json::Value;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::disconnect::{classify, Disconnect};
use super::forwarder::EventForwarder;
use super::heartbeat::{self, HeartbeatState, HeartbeatTask};
use super::{ConnectionError, Session};
use crate::events::{EventContext, EventDispatcher, GatewayEventType};
use crate::pool::SessionQueue;
use crate::protocol::{
    CloseCode, GatewayMessage, IdentifyPayload, OpCode, ReadyPayload, ResumePayload,
};

/// Channel buffer size for outgoing frames
const OUTBOUND_BUFFER: usize = 64;

/// How long the writer gets to flush and close after the loop ends
const WRITER_DRAIN: Duration = Duration::from_secs(1);

/// Connection tuning taken from gateway settings
#[derive(Debug, Clone, Copy)]
pub struct ConnectionSettings {
    /// Heartbeat interval when Hello carries none
    pub fallback_heartbeat: Duration,
    /// End the connection when a heartbeat goes un-ACKed
    pub heartbeat_watchdog: bool,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self::from(&GatewaySettings::default())
    }
}

impl From<&GatewaySettings> for ConnectionSettings {
    fn from(settings: &GatewaySettings) -> Self {
        Self {
            fallback_heartbeat: settings.fallback_heartbeat,
            heartbeat_watchdog: settings.heartbeat_watchdog,
        }
    }
}

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    /// Opening the socket
    Connecting,
    /// Socket open, waiting for op=10
    AwaitingHello,
    /// Identify or Resume sent
    Handshaking,
    /// READY or RESUMED received, heartbeat running
    Ready,
}

/// Build the handshake frame for a session
///
/// A session with an id resumes from its last sequence; anything else
/// identifies from scratch.
pub fn handshake_frame(
    session: &Session,
    authorization: &str,
) -> Result<GatewayMessage, serde_json::Error> {
    if session.can_resume() {
        GatewayMessage::resume(&ResumePayload {
            token: authorization.to_string(),
            session_id: session.session_id().to_string(),
            seq: session.last_sequence(),
        })
    } else {
        GatewayMessage::identify(&IdentifyPayload::new(
            authorization,
            session.intents(),
            session.shard().pair(),
        ))
    }
}

/// A single connection attempt for one shard
pub struct Connection {
    id: Uuid,
    session: Session,
    dispatcher: Arc<EventDispatcher>,
    queue: SessionQueue,
    settings: ConnectionSettings,
    state: ConnectionState,
    /// Cleared by op=9, set by op=7
    can_reconnect: bool,
    heartbeat_period: Duration,
    heartbeat_state: Arc<HeartbeatState>,
    heartbeat: Option<HeartbeatTask>,
}

impl Connection {
    pub fn new(
        session: Session,
        dispatcher: Arc<EventDispatcher>,
        queue: SessionQueue,
        settings: ConnectionSettings,
    ) -> Self {
        let heartbeat_state = HeartbeatState::new(session.last_sequence());
        Self {
            id: Uuid::new_v4(),
            session,
            dispatcher,
            queue,
            settings,
            state: ConnectionState::Disconnected,
            can_reconnect: true,
            heartbeat_period: settings.fallback_heartbeat,
            heartbeat_state,
            heartbeat: None,
        }
    }

    #[inline]
    pub fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[inline]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Drive the connection until it ends, then hand the Session back
    ///
    /// The Session is requeued exactly once, whatever ended the connection.
    pub async fn run(mut self) {
        let disconnect = self.drive().await;
        self.stop_heartbeat();
        self.state = ConnectionState::Disconnected;

        let plan = classify(&disconnect, self.can_reconnect);
        let shard = self.session.shard();

        if let Some(code) = disconnect.close_code().and_then(CloseCode::from_u16) {
            if code.is_configuration_error() {
                error!(
                    connection_id = %self.id,
                    shard = %shard,
                    close_code = %code,
                    "Gateway rejected the connection configuration"
                );
            }
        }

        warn!(
            connection_id = %self.id,
            shard = %shard,
            session_id = %self.session.session_id(),
            seq = self.session.last_sequence(),
            close_code = ?disconnect.close_code(),
            reason = %disconnect,
            resumable = plan.is_resumable(),
            invalidate_token = plan.invalidate_token,
            "Gateway connection lost, requeueing session"
        );

        if plan.invalidate_token {
            self.session.token().invalidate();
        }
        if plan.reset_session {
            self.session.reset();
        }

        self.queue.requeue(self.session);
    }

    async fn drive(&mut self) -> Disconnect {
        let shard = self.session.shard();
        self.state = ConnectionState::Connecting;
        info!(
            connection_id = %self.id,
            shard = %shard,
            url = %self.session.url(),
            resume = self.session.can_resume(),
            "Connecting to gateway"
        );

        let socket = match connect_async(self.session.url()).await {
            Ok((socket, _response)) => socket,
            Err(e) => return Disconnect::Error(e.into()),
        };
        self.state = ConnectionState::AwaitingHello;
        debug!(connection_id = %self.id, shard = %shard, "Socket open, awaiting Hello");

        let (mut sink, mut stream) = socket.split();

        let (outbound, mut rx) = mpsc::channel::<GatewayMessage>(OUTBOUND_BUFFER);
        let mut writer = tokio::spawn(async move {
            while let Some(frame) = rx.recv().await {
                let json = match frame.to_json() {
                    Ok(json) => json,
                    Err(e) => {
                        warn!(error = %e, op = %frame.op, "Failed to encode frame");
                        continue;
                    }
                };
                if sink.send(Message::Text(json)).await.is_err() {
                    break;
                }
            }

            // Close the WebSocket when the channel is closed
            let _ = sink.close().await;
        });

        let (zombie_tx, mut zombie_rx) = mpsc::channel::<()>(1);
        let (failed_tx, mut failed_rx) = mpsc::channel(1);
        let events = EventForwarder::spawn(shard, Arc::clone(&self.dispatcher), failed_tx);
        let links = Links {
            outbound: &outbound,
            zombie: &zombie_tx,
            events: &events,
        };

        let disconnect = loop {
            let frame = tokio::select! {
                frame = stream.next() => frame,
                Some(()) = zombie_rx.recv() => break Disconnect::HeartbeatTimeout,
                Some(e) = failed_rx.recv() => break Disconnect::Error(ConnectionError::from(e)),
            };

            let message = match frame {
                Some(Ok(Message::Text(text))) => GatewayMessage::from_json(&text),
                Some(Ok(Message::Binary(bytes))) => GatewayMessage::from_slice(&bytes),
                Some(Ok(Message::Close(close))) => {
                    break Disconnect::Closed(close.map(|c| u16::from(c.code)));
                }
                Some(Ok(_)) => continue,
                Some(Err(e)) => break Disconnect::Error(e.into()),
                None => break Disconnect::Closed(None),
            };

            let flow = match message {
                Ok(message) => self.handle_message(message, links).await,
                Err(e) => Err(e.into()),
            };
            match flow {
                Ok(ControlFlow::Continue(())) => {}
                Ok(ControlFlow::Break(disconnect)) => break disconnect,
                Err(e) => break Disconnect::Error(e),
            }
        };

        // The heartbeat holds a sender; stop it so the writer can finish
        self.stop_heartbeat();
        drop(outbound);
        if tokio::time::timeout(WRITER_DRAIN, &mut writer).await.is_err() {
            debug!(connection_id = %self.id, shard = %shard, "Writer did not finish, aborting");
            writer.abort();
        }

        // Sequences of queued events are already recorded; deliver them
        // before the Session can be resumed past them
        events.finish().await;

        disconnect
    }

    async fn handle_message(
        &mut self,
        message: GatewayMessage,
        links: Links<'_>,
    ) -> Result<ControlFlow<Disconnect>, ConnectionError> {
        let shard = self.session.shard();

        match message.op {
            OpCode::Hello => {
                self.heartbeat_period = message
                    .as_hello()
                    .and_then(|hello| hello.interval())
                    .unwrap_or(self.settings.fallback_heartbeat);
                self.state = ConnectionState::Handshaking;

                let authorization = self.session.token().authorize().await?;
                let frame = handshake_frame(&self.session, &authorization)?;
                info!(
                    connection_id = %self.id,
                    shard = %shard,
                    handshake = %frame.op,
                    session_id = %self.session.session_id(),
                    seq = self.session.last_sequence(),
                    heartbeat_ms = self.heartbeat_period.as_millis(),
                    "Hello received, sending handshake"
                );
                return Ok(send(links.outbound, frame).await);
            }
            OpCode::Dispatch => self.handle_dispatch(message, links)?,
            OpCode::HeartbeatAck => {
                tracing::trace!(shard = %shard, "Heartbeat ACK");
                self.heartbeat_state.ack();
            }
            OpCode::Heartbeat => {
                debug!(shard = %shard, "Server requested a heartbeat");
                return Ok(send(links.outbound, self.heartbeat_state.frame()).await);
            }
            OpCode::Reconnect => {
                info!(shard = %shard, "Server requested reconnect");
                self.can_reconnect = true;
            }
            OpCode::InvalidSession => {
                warn!(shard = %shard, session_id = %self.session.session_id(), "Invalid session");
                self.can_reconnect = false;
                return Ok(ControlFlow::Break(Disconnect::InvalidSession));
            }
            op @ (OpCode::Identify | OpCode::Resume) => {
                return Err(ConnectionError::UnexpectedOpcode(op));
            }
        }

        Ok(ControlFlow::Continue(()))
    }

    fn handle_dispatch(
        &mut self,
        message: GatewayMessage,
        links: Links<'_>,
    ) -> Result<(), ConnectionError> {
        // Sequence first: a disconnect right after must resume from here
        if let Some(seq) = message.s {
            let seq = self.session.record_sequence(seq);
            self.heartbeat_state.set_sequence(seq);
        }

        let event_type = message.t.unwrap_or_default();
        let data = message.d.unwrap_or(Value::Null);
        let shard = self.session.shard();

        match GatewayEventType::from_str(&event_type) {
            Some(GatewayEventType::Ready) => {
                let ready = ReadyPayload::deserialize(&data)?;
                self.session.establish(&ready);
                info!(
                    connection_id = %self.id,
                    shard = %self.session.shard(),
                    session_id = %ready.session_id,
                    "Session ready"
                );
                self.start_heartbeat(links);
            }
            Some(GatewayEventType::Resumed) => {
                info!(
                    connection_id = %self.id,
                    shard = %shard,
                    session_id = %self.session.session_id(),
                    seq = self.session.last_sequence(),
                    "Session resumed"
                );
                self.start_heartbeat(links);
            }
            _ => {}
        }

        let ctx = EventContext {
            event_type,
            event_id: message.id,
            shard: self.session.shard(),
            sequence: self.session.last_sequence(),
        };
        if !links.events.forward(ctx, data) {
            return Err(ConnectionError::HandlerStopped);
        }
        Ok(())
    }

    fn start_heartbeat(&mut self, links: Links<'_>) {
        self.stop_heartbeat();
        self.state = ConnectionState::Ready;
        self.heartbeat_state.ack();
        self.heartbeat = Some(HeartbeatTask::new(heartbeat::spawn(
            self.session.shard(),
            self.heartbeat_period,
            self.settings.heartbeat_watchdog,
            Arc::clone(&self.heartbeat_state),
            links.outbound.clone(),
            links.zombie.clone(),
        )));
    }

    fn stop_heartbeat(&mut self) {
        if self.heartbeat.take().is_some() {
            debug!(shard = %self.session.shard(), "Heartbeat stopped");
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("shard", &self.session.shard())
            .field("state", &self.state)
            .field("can_reconnect", &self.can_reconnect)
            .finish()
    }
}

/// Channels the receive loop hands frames and events to
#[derive(Clone, Copy)]
struct Links<'a> {
    outbound: &'a mpsc::Sender<GatewayMessage>,
    zombie: &'a mpsc::Sender<()>,
    events: &'a EventForwarder,
}

/// Queue a frame for the writer; a closed writer means the socket is gone
async fn send(
    outbound: &mpsc::Sender<GatewayMessage>,
    frame: GatewayMessage,
) -> ControlFlow<Disconnect> {
    if outbound.send(frame).await.is_err() {
        return ControlFlow::Break(Disconnect::Closed(None));
    }
    ControlFlow::Continue(())
}
