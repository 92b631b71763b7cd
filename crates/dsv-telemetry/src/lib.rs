//! # DSV Telemetry
//!
//! Structured logging and Prometheus metrics for the signature validation
//! engine. The core crates only emit `tracing` events; installing a
//! subscriber and recording metrics is left to the service layer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use dsv_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("telemetry");
//!     // Validation runs now log and record metrics
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DSV_SERVICE_NAME` | `dsv` | Service name in log lines |
//! | `DSV_LOG_LEVEL` | `info` | Log level filter (falls back to `RUST_LOG`) |
//! | `DSV_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `DSV_JSON_LOGS` | `false` | JSON formatted logs |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, record_failed_check, record_orphans, record_signature, register_metrics,
    CHECKS_FAILED, ORPHAN_REFERENCES, SIGNATURES_VALIDATED, VALIDATION_DURATION,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
