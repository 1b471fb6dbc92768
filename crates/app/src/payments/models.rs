//! Payment Models

use std::fmt;

use uuid::Uuid;

/// Intent creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPaymentIntent {
    /// Amount in minor currency units.
    pub amount: i64,
    /// Lowercase ISO 4217 code.
    pub currency: String,
    pub metadata: PaymentMetadata,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMetadata {
    pub user_uuid: Uuid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub amount: i64,
    pub currency: String,
    pub status: IntentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentConfirmation {
    pub id: String,
    pub status: IntentStatus,
    pub charge_id: Option<String>,
}

impl PaymentConfirmation {
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == IntentStatus::Succeeded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentStatus {
    RequiresPaymentMethod,
    Succeeded,
    Failed,
}

impl IntentStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RequiresPaymentMethod => "requires_payment_method",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for IntentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
