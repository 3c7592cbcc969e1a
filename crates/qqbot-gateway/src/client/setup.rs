//! Client construction from configuration

use qqbot_api::{AppAccessTokenClient, BotApi, BotHttp};
use qqbot_common::{AppError, BotConfig, Token};
use std::sync::Arc;

use super::Client;
use crate::events::{EventDispatcher, LoggingHandler};

/// Build the credential from the configured secret or static token
///
/// A secret takes precedence over a static token.
pub fn create_token(config: &BotConfig) -> Result<Arc<Token>, AppError> {
    let credentials = &config.credentials;

    if let Some(secret) = &credentials.secret {
        tracing::info!(app_id = %credentials.app_id, "Using app secret credentials");
        let source = AppAccessTokenClient::new(config.api.token_url.clone(), config.api.timeout)?;
        return Ok(Arc::new(Token::with_secret(
            credentials.app_id.clone(),
            secret.clone(),
            Arc::new(source),
        )));
    }

    if let Some(token) = &credentials.token {
        tracing::info!(app_id = %credentials.app_id, "Using static bot token");
        return Ok(Arc::new(Token::bot(credentials.app_id.clone(), token.clone())));
    }

    Err(AppError::Config(
        "either QQBOT_SECRET or QQBOT_TOKEN must be set".to_string(),
    ))
}

/// Initialize all dependencies and create the [`Client`]
pub fn create_client(config: &BotConfig, dispatcher: EventDispatcher) -> Result<Client, AppError> {
    let token = create_token(config)?;
    let http = BotHttp::new(&config.api, Arc::clone(&token))?;
    tracing::info!(base_url = %http.base_url(), sandbox = config.api.sandbox, "REST client ready");

    Ok(Client::new(
        Arc::new(BotApi::new(http)),
        token,
        Arc::new(dispatcher),
        config.gateway.clone(),
    ))
}

/// Run the gateway with a dispatcher that logs every event
pub async fn run(config: BotConfig) -> Result<(), AppError> {
    let dispatcher = EventDispatcher::with_default_decoders(Arc::new(LoggingHandler))
        .with_plain_handler(Arc::new(LoggingHandler));
    create_client(&config, dispatcher)?.run().await
}
