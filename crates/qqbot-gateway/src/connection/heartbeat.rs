//! Heartbeat loop
//!
//! Started once the connection is Ready. Sends op=1 with the last seen
//! sequence on every tick and optionally watches for missing ACKs.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use super::ShardInfo;
use crate::protocol::GatewayMessage;

/// State shared between the receive loop and the heartbeat task
#[derive(Debug)]
pub struct HeartbeatState {
    acked: AtomicBool,
    sequence: AtomicU64,
}

impl HeartbeatState {
    pub fn new(sequence: u64) -> Arc<Self> {
        Arc::new(Self {
            acked: AtomicBool::new(true),
            sequence: AtomicU64::new(sequence),
        })
    }

    /// Record an op=11
    pub fn ack(&self) {
        self.acked.store(true, Ordering::Release);
    }

    /// A heartbeat went out; the next op=11 answers it
    pub fn mark_sent(&self) {
        self.acked.store(false, Ordering::Release);
    }

    pub fn is_acked(&self) -> bool {
        self.acked.load(Ordering::Acquire)
    }

    /// Mirror the session's last sequence
    pub fn set_sequence(&self, seq: u64) {
        self.sequence.store(seq, Ordering::Release);
    }

    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::Acquire)
    }

    /// Heartbeat frame for the current sequence; `null` before any dispatch
    pub fn frame(&self) -> GatewayMessage {
        let seq = self.sequence();
        GatewayMessage::heartbeat((seq > 0).then_some(seq))
    }
}

/// Handle to a running heartbeat; the task is aborted when this is dropped
#[derive(Debug)]
pub struct HeartbeatTask(JoinHandle<()>);

impl HeartbeatTask {
    pub(crate) fn new(handle: JoinHandle<()>) -> Self {
        Self(handle)
    }
}

impl Drop for HeartbeatTask {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Spawn the heartbeat task
///
/// The task stops quietly once `outbound` is closed. With `watchdog` on, a
/// tick that finds the previous heartbeat un-ACKed signals `zombie` and stops.
pub fn spawn(
    shard: ShardInfo,
    period: Duration,
    watchdog: bool,
    state: Arc<HeartbeatState>,
    outbound: mpsc::Sender<GatewayMessage>,
    zombie: mpsc::Sender<()>,
) -> JoinHandle<()> {
    tracing::debug!(
        shard = %shard,
        interval_ms = period.as_millis(),
        watchdog,
        "Heartbeat started"
    );

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            if watchdog && !state.is_acked() {
                tracing::warn!(shard = %shard, "Heartbeat not acknowledged, connection zombied");
                let _ = zombie.try_send(());
                return;
            }

            state.mark_sent();
            let frame = state.frame();
            tracing::trace!(shard = %shard, seq = state.sequence(), "Sending heartbeat");

            if outbound.send(frame).await.is_err() {
                tracing::debug!(shard = %shard, "Heartbeat stopped, socket closed");
                return;
            }
        }
    })
}
