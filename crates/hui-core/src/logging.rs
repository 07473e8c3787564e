#![forbid(unsafe_code)]

//! Structured logging setup.
//!
//! Library code only emits `tracing` events. Binaries and test runs that want
//! to see them call [`init_json_logging`] once; filtering follows `RUST_LOG`
//! (default [`DEFAULT_FILTER`]).

use tracing_subscriber::EnvFilter;

/// Default directive when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "hui=warn,hui_core=info,hui_widgets=info";

/// Error returned when a global subscriber is already installed.
#[derive(Debug)]
pub struct LoggingInitError {
    message: String,
}

impl std::fmt::Display for LoggingInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "failed to install JSON logging: {}", self.message)
    }
}

impl std::error::Error for LoggingInitError {}

/// Install a JSON `tracing` subscriber filtered by `RUST_LOG`.
pub fn init_json_logging() -> Result<(), LoggingInitError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|err| LoggingInitError {
            message: err.to_string(),
        })
}
