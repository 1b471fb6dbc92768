//! Orders service errors.

use rust_decimal::Decimal;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use storefront::{orders::OrderStateError, pricing::PricingError, stock::StockError};
use thiserror::Error;

use crate::{domain::products::models::ProductUuid, payments::PaymentError};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("declared total {declared} does not match computed total {computed}")]
    AmountMismatch { declared: Decimal, computed: Decimal },

    #[error("order not found")]
    NotFound,

    #[error("product not found: {0}")]
    ProductNotFound(ProductUuid),

    /// A product on an order line was removed before capture; carries the line title.
    #[error("ordered product no longer exists: {0}")]
    OrderedProductMissing(String),

    #[error("not enough stock for product: {0}")]
    InsufficientStock(String),

    #[error("payment failed")]
    PaymentFailed,

    #[error("order has already been captured")]
    AlreadyCaptured,

    #[error("order already exists")]
    AlreadyExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("pricing error")]
    Pricing(#[source] PricingError),

    #[error("payment gateway error")]
    Payment(#[from] PaymentError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

impl From<PricingError> for OrdersServiceError {
    fn from(error: PricingError) -> Self {
        match error {
            PricingError::AmountMismatch { declared, computed } => {
                Self::AmountMismatch { declared, computed }
            }
            other => Self::Pricing(other),
        }
    }
}

impl From<StockError> for OrdersServiceError {
    fn from(error: StockError) -> Self {
        match error {
            StockError::Insufficient { title, .. } => Self::InsufficientStock(title),
        }
    }
}

impl From<OrderStateError> for OrdersServiceError {
    fn from(error: OrderStateError) -> Self {
        match error {
            OrderStateError::AlreadyCaptured => Self::AlreadyCaptured,
            OrderStateError::UnknownStatus(_) => Self::InvalidData,
        }
    }
}
