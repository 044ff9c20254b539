//! Tracing subscriber setup for binaries embedding the client.
//!
//! The library only emits `tracing` events; nothing is printed unless the
//! host installs a subscriber, either its own or the one built here.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tracing configuration.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            log_level: "info,vault_token=info".to_string(),
            json_output: false,
        }
    }
}

impl TracingConfig {
    /// Set the fallback filter.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.log_level))
    }
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Fails if a global subscriber is already set.
pub fn init_tracing(config: &TracingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    if config.json_output {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(config.filter())
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    }
}
