//! Integration test utilities for the gateway client
//!
//! This crate provides an in-process mock of the bot platform (REST bootstrap,
//! access-token endpoint, scripted WebSocket gateway) and helpers for running
//! the real client against it.

pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
