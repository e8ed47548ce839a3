use thiserror::Error;

/// Errors raised while bootstrapping shared infrastructure.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),

    #[error("Telemetry error: {0}")]
    TelemetryError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for CoreError {
    fn from(err: config::ConfigError) -> Self {
        CoreError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<opentelemetry::trace::TraceError> for CoreError {
    fn from(err: opentelemetry::trace::TraceError) -> Self {
        CoreError::TelemetryError(err.to_string())
    }
}

impl From<tracing_subscriber::util::TryInitError> for CoreError {
    fn from(err: tracing_subscriber::util::TryInitError) -> Self {
        CoreError::TelemetryError(err.to_string())
    }
}
