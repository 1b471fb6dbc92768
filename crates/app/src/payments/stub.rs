//! In-memory payment gateway.

use async_trait::async_trait;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::payments::{
    PaymentGateway,
    config::PaymentFailureMode,
    errors::PaymentError,
    models::{IntentStatus, NewPaymentIntent, PaymentConfirmation, PaymentIntent},
};

/// Payment gateway that never leaves the process.
///
/// Intent ids and client secrets are unique per call but carry no meaning to any
/// real provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPaymentGateway {
    failure_mode: PaymentFailureMode,
}

impl StubPaymentGateway {
    #[must_use]
    pub const fn new(failure_mode: PaymentFailureMode) -> Self {
        Self { failure_mode }
    }
}

fn synthetic_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::now_v7().simple())
}

#[async_trait]
impl PaymentGateway for StubPaymentGateway {
    async fn create_payment_intent(
        &self,
        intent: NewPaymentIntent,
    ) -> Result<PaymentIntent, PaymentError> {
        let id = synthetic_id("pi");
        let client_secret = format!("{id}_secret_{}", Uuid::new_v4().simple());

        debug!(
            intent_id = %id,
            amount = intent.amount,
            currency = %intent.currency,
            user_uuid = %intent.metadata.user_uuid,
            "created stub payment intent"
        );

        Ok(PaymentIntent {
            id,
            client_secret,
            amount: intent.amount,
            currency: intent.currency,
            status: IntentStatus::RequiresPaymentMethod,
        })
    }

    async fn confirm_payment(&self, intent_id: &str) -> Result<PaymentConfirmation, PaymentError> {
        let confirmation = match self.failure_mode {
            PaymentFailureMode::Succeed => PaymentConfirmation {
                id: intent_id.to_string(),
                status: IntentStatus::Succeeded,
                charge_id: Some(synthetic_id("ch")),
            },
            PaymentFailureMode::Decline => {
                warn!(intent_id, "stub payment gateway declining confirmation");

                PaymentConfirmation {
                    id: intent_id.to_string(),
                    status: IntentStatus::Failed,
                    charge_id: None,
                }
            }
        };

        Ok(confirmation)
    }
}
