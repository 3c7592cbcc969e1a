//! Subscriber setup
//!
//! One fmt layer (pretty or JSON) behind an `EnvFilter`. `RUST_LOG` replaces
//! the configured filter entirely when set.

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::Environment;

/// Dependencies that are far too chatty below `info`
const QUIET_TARGETS: &[&str] = &["tungstenite", "tokio_tungstenite", "hyper_util", "reqwest"];

/// Log output options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level for this workspace's own targets
    pub level: Level,
    /// Emit one JSON object per event
    pub json: bool,
    /// Include file and line of the call site
    pub source_location: bool,
    pub thread_names: bool,
    /// Keep websocket and HTTP internals at `info` even when `level` is lower
    pub quiet_dependencies: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            source_location: true,
            thread_names: false,
            quiet_dependencies: true,
        }
    }
}

impl TracingConfig {
    /// Debug level, human-readable
    #[must_use]
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            thread_names: true,
            ..Self::default()
        }
    }

    /// Info level, JSON lines
    #[must_use]
    pub fn production() -> Self {
        Self {
            json: true,
            source_location: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Production => Self::production(),
            Environment::Staging => Self::default(),
            Environment::Development => Self::development(),
        }
    }

    /// Filter directives used when `RUST_LOG` is unset
    pub fn directives(&self) -> String {
        let level = self.level.to_string().to_lowercase();
        if !self.quiet_dependencies || self.level <= Level::INFO {
            return level;
        }
        std::iter::once(level)
            .chain(QUIET_TARGETS.iter().map(|target| format!("{target}=info")))
            .collect::<Vec<_>>()
            .join(",")
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.directives()))
    }

    fn layer(&self) -> Box<dyn Layer<Registry> + Send + Sync> {
        let layer = fmt::layer()
            .with_file(self.source_location)
            .with_line_number(self.source_location)
            .with_thread_names(self.thread_names);

        if self.json {
            layer.json().boxed()
        } else {
            layer.boxed()
        }
    }
}

/// Install the default subscriber
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing() {
    init_tracing_with_config(TracingConfig::default());
}

/// Install a subscriber built from `config`
///
/// # Panics
/// Panics if a global subscriber is already set.
pub fn init_tracing_with_config(config: TracingConfig) {
    if let Err(e) = try_init_tracing_with_config(config) {
        panic!("{e}");
    }
}

/// Like [`init_tracing`], but reports a second initialization instead of panicking
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(TracingConfig::default())
}

pub fn try_init_tracing_with_config(config: TracingConfig) -> Result<(), TracingError> {
    tracing_subscriber::registry()
        .with(config.layer())
        .with(config.filter())
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
