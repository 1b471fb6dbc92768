//! Payment gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment gateway error: {0}")]
    Gateway(String),
}
