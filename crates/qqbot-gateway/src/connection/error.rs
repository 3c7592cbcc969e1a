//! Connection errors

use qqbot_common::AppError;
use tokio_tungstenite::tungstenite;

use crate::events::DispatchError;
use crate::protocol::OpCode;

/// Errors that end a single connection
///
/// These never leave the connection: they are logged, classified and turned
/// into a requeue.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("websocket transport error: {0}")]
    Transport(#[from] tungstenite::Error),

    #[error("malformed gateway frame: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected {0} frame from server")]
    UnexpectedOpcode(OpCode),

    #[error("credential unavailable: {0}")]
    Credential(#[from] AppError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("event handler task stopped")]
    HandlerStopped,
}
