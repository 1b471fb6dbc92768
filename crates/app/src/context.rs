//! App Context

use std::sync::Arc;

use clap::Args;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::orders::{OrdersService, PgOrdersService},
    payments::{PaymentsConfig, StubPaymentGateway},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrations(#[source] sqlx::migrate::MigrateError),

    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Settings needed to assemble the application services.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// PostgreSQL connection string
    #[arg(long = "database-url", env = "DATABASE_URL")]
    pub database_url: String,

    /// Apply pending migrations on startup
    #[arg(long = "migrate", env = "DATABASE_MIGRATE", default_value_t = false)]
    pub migrate: bool,

    #[command(flatten)]
    pub payments: PaymentsConfig,
}

#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the currency code is unknown, establishing a database connection
    /// fails, or requested migrations cannot be applied.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let currency = resolve_currency(&config.payments.currency)?;

        let pool = database::connect(&config.database_url)
            .await
            .map_err(AppInitError::Database)?;

        if config.migrate {
            database::migrate(&pool)
                .await
                .map_err(AppInitError::Migrations)?;
        }

        let db = Db::new(pool);
        let gateway = Arc::new(StubPaymentGateway::new(config.payments.failure_mode));

        tracing::info!(
            currency = currency.iso_alpha_code,
            failure_mode = ?config.payments.failure_mode,
            "using stub payment gateway"
        );

        Ok(Self {
            orders: Arc::new(PgOrdersService::new(db, gateway, currency)),
        })
    }
}

/// Look up an ISO 4217 currency by its alphabetic code, ignoring case.
///
/// # Errors
///
/// Returns [`AppInitError::UnknownCurrency`] when no such currency exists.
pub fn resolve_currency(code: &str) -> Result<&'static Currency, AppInitError> {
    iso::find(&code.trim().to_uppercase())
        .ok_or_else(|| AppInitError::UnknownCurrency(code.to_string()))
}
