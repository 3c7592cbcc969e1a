//! Gateway protocol definitions
//!
//! Op codes, close codes, the frame envelope and the handshake payloads.

mod close_codes;
mod messages;
mod opcodes;
mod payloads;

pub use close_codes::{CloseCode, Recovery};
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use payloads::{
    HelloPayload, IdentifyPayload, IdentifyProperties, ReadyPayload, ResumePayload,
};
