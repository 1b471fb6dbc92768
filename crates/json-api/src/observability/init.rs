//! Telemetry lifecycle management.

use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::{error, info};

use crate::config::ServerConfig;

use super::{ObservabilityError, logging, otel, settings};

/// Holds the tracer provider so buffered spans can be flushed on shutdown.
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
}

impl Observability {
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        settings::apply_runtime_config(&config.observability);

        let tracer_provider = config
            .observability
            .otel_enabled
            .then(|| otel::build_tracer_provider(&config.observability))
            .transpose()?;

        logging::init_subscriber(config, tracer_provider.as_ref())?;

        if tracer_provider.is_some() {
            info!(
                endpoint = %config.observability.otel_exporter_otlp_endpoint,
                "exporting traces over OTLP"
            );
        }

        Ok(Self { tracer_provider })
    }

    pub(crate) fn shutdown(self) {
        let Some(provider) = self.tracer_provider else {
            return;
        };

        if let Err(source) = provider.shutdown() {
            error!("failed to flush traces on shutdown: {source}");
        }
    }
}
