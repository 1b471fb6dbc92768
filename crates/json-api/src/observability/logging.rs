//! Tracing subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::Subscriber;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::config::{
    ServerConfig,
    observability::{LogFormat, LoggingConfig},
};

use super::ObservabilityError;

/// Crates whose chatter is capped at warn unless `RUST_LOG` says otherwise.
const QUIET_TARGETS: &[&str] = &["h2", "hyper", "tonic", "tower", "opentelemetry", "sqlx"];

pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let otel_layer: Option<Box<dyn Layer<Registry> + Send + Sync>> =
        tracer_provider.map(|provider| {
            let tracer = provider.tracer(config.observability.otel_service_name.clone());

            tracing_opentelemetry::layer().with_tracer(tracer).boxed()
        });

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(format_layer(config.logging.log_format))
        .with(env_filter(&config.logging))
        .try_init()?;

    Ok(())
}

fn format_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    match format {
        LogFormat::Compact => tracing_subscriber::fmt::layer()
            .compact()
            .with_target(true)
            .with_line_number(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    }
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_invalid| EnvFilter::new(default_directives(&config.log_level)))
}

fn default_directives(level: &str) -> String {
    QUIET_TARGETS
        .iter()
        .fold(level.to_string(), |directives, target| {
            format!("{directives},{target}=warn")
        })
}
