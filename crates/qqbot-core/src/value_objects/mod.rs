//! Value objects

mod intents;

pub use intents::{Intents, IntentsParseError};
