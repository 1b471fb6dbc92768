//! Mapping of order service failures to HTTP responses.

use tracing::{error, warn};

use storefront_app::domain::orders::OrdersServiceError;

use crate::errors::ApiError;

pub(crate) fn create_order_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::AmountMismatch { declared, computed } => {
            warn!(%declared, %computed, "declared order total does not match");

            ApiError::bad_request("Total amount mismatch. Please try again.")
        }
        OrdersServiceError::ProductNotFound(product) => {
            ApiError::not_found(format!("Product with ID {product} not found"))
        }
        OrdersServiceError::InvalidData
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData => ApiError::bad_request("Invalid order payload"),
        OrdersServiceError::AlreadyExists => ApiError::conflict("Order already exists"),
        other => {
            error!("failed to create order: {other}");

            ApiError::internal("Error while creating payment intent!")
        }
    }
}

pub(crate) fn capture_payment_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::NotFound => ApiError::not_found("Order can not be found"),
        OrdersServiceError::OrderedProductMissing(title) => {
            ApiError::not_found(format!("Product not found: {title}"))
        }
        OrdersServiceError::InsufficientStock(title) => {
            ApiError::bad_request(format!("Not enough stock for product: {title}"))
        }
        OrdersServiceError::PaymentFailed => ApiError::bad_request("Payment failed"),
        OrdersServiceError::AlreadyCaptured => {
            ApiError::conflict("Order has already been captured")
        }
        other => {
            error!("failed to capture payment: {other}");

            ApiError::internal("Some error occurred!")
        }
    }
}

/// Metric label for a failed capture.
pub(crate) fn capture_failure_reason(error: &OrdersServiceError) -> &'static str {
    match error {
        OrdersServiceError::NotFound => "order_not_found",
        OrdersServiceError::OrderedProductMissing(_) => "product_not_found",
        OrdersServiceError::InsufficientStock(_) => "insufficient_stock",
        OrdersServiceError::PaymentFailed => "payment_failed",
        OrdersServiceError::AlreadyCaptured => "already_captured",
        _ => "internal",
    }
}

pub(crate) fn lookup_error(error: OrdersServiceError, not_found: &str) -> ApiError {
    match error {
        OrdersServiceError::NotFound => ApiError::not_found(not_found),
        other => {
            error!("failed to load orders: {other}");

            ApiError::internal("Some error occurred!")
        }
    }
}
