//! Logging, tracing and request timing settings

use clap::{Args, ValueEnum};

/// Log line encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// One human-readable line per event.
    Compact,

    /// One JSON object per event, including the active span list.
    Json,
}

#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not a valid filter
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Trace export and request timing.
///
/// Export is off unless `OTEL_ENABLED` is set; logs are written either way.
#[derive(Debug, Args)]
pub struct ObservabilityConfig {
    /// Export spans over OTLP gRPC
    #[arg(long, env = "OTEL_ENABLED", default_value_t = false)]
    pub otel_enabled: bool,

    #[arg(
        long,
        env = "OTEL_EXPORTER_OTLP_ENDPOINT",
        default_value = "http://localhost:4317"
    )]
    pub otel_exporter_otlp_endpoint: String,

    #[arg(long, env = "OTEL_EXPORTER_OTLP_TIMEOUT_SECONDS", default_value_t = 3)]
    pub otel_exporter_otlp_timeout_seconds: u64,

    #[arg(long, env = "OTEL_SERVICE_NAME", default_value = "storefront-json")]
    pub otel_service_name: String,

    #[arg(long, env = "OTEL_SERVICE_VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub otel_service_version: String,

    #[arg(long, env = "OTEL_DEPLOYMENT_ENVIRONMENT", default_value = "development")]
    pub otel_deployment_environment: String,

    /// Fraction of root traces kept, clamped to [0.0, 1.0]
    #[arg(long, env = "OTEL_TRACE_SAMPLE_RATIO", default_value_t = 1.0)]
    pub otel_trace_sample_ratio: f64,

    /// Requests slower than this are logged at warn
    #[arg(long, env = "SLOW_REQUEST_THRESHOLD_MS", default_value_t = 1_000)]
    pub slow_request_threshold_ms: u64,
}
