//! Bot credentials

mod token;

pub use token::{AccessToken, AccessTokenSource, Token, TokenMode};
