//! Server configuration module

use clap::Parser;
use storefront_app::context::AppConfig;

use crate::config::{
    observability::{LoggingConfig, ObservabilityConfig},
    server::ServerRuntimeConfig,
};

pub(crate) mod observability;
pub(crate) mod server;

/// Storefront JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "storefront-json", about = "Storefront JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Observability (traces/metrics) settings.
    #[command(flatten)]
    pub observability: ObservabilityConfig,

    /// Database and payment settings.
    #[command(flatten)]
    pub app: AppConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use storefront_app::payments::PaymentFailureMode;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parses_defaults_with_database_url() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "storefront-json",
            "--database-url",
            "postgres://localhost/storefront",
            "--payment-failure-mode",
            "decline",
        ])?;

        assert_eq!(config.app.database_url, "postgres://localhost/storefront");
        assert_eq!(config.app.payments.failure_mode, PaymentFailureMode::Decline);
        assert!(!config.app.migrate);
        assert!(config.observability.slow_request_threshold_ms > 0);

        Ok(())
    }

    #[test]
    fn socket_addr_joins_host_and_port() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "storefront-json",
            "--host",
            "127.0.0.1",
            "--port",
            "9000",
            "--database-url",
            "postgres://localhost/storefront",
        ])?;

        assert_eq!(config.socket_addr(), "127.0.0.1:9000");

        Ok(())
    }
}
