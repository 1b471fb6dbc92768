//! Payments
//!
//! The order flow talks to a payment provider through [`PaymentGateway`]. The only
//! implementation shipped is [`StubPaymentGateway`], an in-memory stand-in that
//! issues synthetic intent identifiers and confirms them according to its
//! [`PaymentFailureMode`].

use async_trait::async_trait;
use mockall::automock;

pub mod config;
pub mod errors;
pub mod models;
pub mod stub;

pub use config::{PaymentFailureMode, PaymentsConfig};
pub use errors::PaymentError;
pub use models::{IntentStatus, NewPaymentIntent, PaymentConfirmation, PaymentIntent};
pub use stub::StubPaymentGateway;

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment intent for the given amount in minor currency units.
    async fn create_payment_intent(
        &self,
        intent: NewPaymentIntent,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Confirm a previously opened intent.
    async fn confirm_payment(&self, intent_id: &str) -> Result<PaymentConfirmation, PaymentError>;
}
