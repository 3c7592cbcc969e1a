//! QQ bot gateway entry point
//!
//! Run with:
//! ```bash
//! cargo run -p qqbot-gateway
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`). Every
//! received event is logged.

use qqbot_common::{try_init_tracing_with_config, BotConfig, TracingConfig};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Gateway client stopped");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = BotConfig::from_env()?;

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        app_id = %config.credentials.app_id,
        sandbox = config.api.sandbox,
        intents = %config.gateway.intents,
        "Configuration loaded"
    );

    tokio::select! {
        result = qqbot_gateway::run(config) => {
            if let Err(e) = result {
                error!(code = e.error_code(), fatal = e.is_fatal(), error = %e, "Gateway client failed");
                return Err(e.into());
            }
        }
        _ = tokio::signal::ctrl_c() => warn!("Shutdown signal received"),
    }

    Ok(())
}
