//! Logging bootstrap
//!
//! TigerStyle: Explicit telemetry configuration with bounded resource usage.
//!
//! The library logs through `tracing`; this module wires the fmt
//! subscriber up for binaries and tests. Metrics and trace export belong
//! to the hosting process, not this library.

use crate::error::Result;
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config say otherwise
const LOG_FILTER_FALLBACK: &str = "info";

/// Logging configuration
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name stamped on the bootstrap event
    pub service_name: String,
    /// Filter directive applied when `RUST_LOG` is unset
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "retinue".to_string(),
            log_level: LOG_FILTER_FALLBACK.to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create a configuration for the named service
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            ..Default::default()
        }
    }

    /// Override the fallback filter directive
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Build a configuration from the environment
    ///
    /// `RUST_LOG` supplies the filter directive when set.
    pub fn from_env() -> Self {
        match std::env::var("RUST_LOG") {
            Ok(level) => Self::default().with_log_level(level),
            Err(_) => Self::default(),
        }
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the configured level. Calling this more than
/// once is harmless; only the first call installs a subscriber, which
/// keeps test binaries that each bootstrap logging from panicking.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    tracing::debug!(service = %config.service_name, "telemetry initialized");
    Ok(())
}
