//! Gateway client wiring

mod client;
mod plan;
mod setup;

pub use client::Client;
pub use plan::ShardPlan;
pub use setup::{create_client, create_token, run};
