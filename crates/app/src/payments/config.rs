//! Payment configuration.

use clap::{Args, ValueEnum};

/// How the stub gateway answers confirmation requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum PaymentFailureMode {
    /// Every confirmation succeeds.
    #[default]
    Succeed,

    /// Every confirmation is declined.
    Decline,
}

#[derive(Debug, Clone, Args)]
pub struct PaymentsConfig {
    /// Confirmation behaviour of the stub payment gateway
    #[arg(
        long = "payment-failure-mode",
        env = "PAYMENT_FAILURE_MODE",
        value_enum,
        default_value_t = PaymentFailureMode::Succeed
    )]
    pub failure_mode: PaymentFailureMode,

    /// ISO 4217 currency code orders are priced in
    #[arg(long = "payment-currency", env = "PAYMENT_CURRENCY", default_value = "USD")]
    pub currency: String,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            failure_mode: PaymentFailureMode::Succeed,
            currency: "USD".to_string(),
        }
    }
}
