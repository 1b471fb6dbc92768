//! Capture Payment Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use storefront_app::domain::orders::models::{Order, PaymentCapture};

use crate::{
    errors::ApiError,
    extensions::*,
    observability::{record_capture_failure, record_payment_captured},
    orders::{
        errors::{capture_failure_reason, capture_payment_error},
        requests::CapturePaymentRequest,
        responses::OrderResponse,
    },
    state::State,
};

const CAPTURED_MESSAGE: &str = "Payment successful and order confirmed";

/// Payment Captured Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentCapturedResponse {
    pub success: bool,
    pub message: String,

    /// The confirmed order
    pub data: OrderResponse,

    pub order_status: String,
    pub cart_cleared: bool,
}

impl From<Order> for PaymentCapturedResponse {
    fn from(order: Order) -> Self {
        let data = OrderResponse::from(order);

        Self {
            success: true,
            message: CAPTURED_MESSAGE.to_string(),
            order_status: data.order_status.clone(),
            cart_cleared: true,
            data,
        }
    }
}

/// Capture Payment Handler
///
/// Confirms the payment intent, takes stock for every line and clears the originating cart.
/// Nothing is changed unless every step succeeds.
#[endpoint(
    tags("orders"),
    summary = "Capture Payment",
    responses(
        (status_code = StatusCode::OK, description = "Payment captured and order confirmed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Payment failed or not enough stock"),
        (status_code = StatusCode::NOT_FOUND, description = "Order or product not found"),
        (status_code = StatusCode::CONFLICT, description = "Order already captured"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CapturePaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<PaymentCapturedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = capture_payment(state, json.into_inner().into()).await?;

    Ok(Json(order.into()))
}

#[tracing::instrument(
    name = "orders.capture",
    skip_all,
    fields(order_uuid = %capture.order_uuid, payment_intent_id = %capture.payment_intent_id)
)]
async fn capture_payment(state: &State, capture: PaymentCapture) -> Result<Order, ApiError> {
    match state.app.orders.capture_payment(capture).await {
        Ok(order) => {
            record_payment_captured();

            Ok(order)
        }
        Err(error) => {
            record_capture_failure(capture_failure_reason(&error));

            Err(capture_payment_error(error))
        }
    }
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;
    use uuid::Uuid;

    use storefront_app::{
        domain::{
            orders::{MockOrdersService, OrdersServiceError, models::OrderUuid},
            users::UserUuid,
        },
        payments::PaymentError,
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{make_confirmed_order, orders_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("order/capture").post(handler))
    }

    async fn capture_with_error(error: OrdersServiceError) -> TestResult<(StatusCode, String)> {
        let mut orders = MockOrdersService::new();

        orders
            .expect_capture_payment()
            .once()
            .return_once(move |_| Err(error));

        let mut res = TestClient::post("http://example.com/order/capture")
            .json(&json!({ "paymentIntentId": "pi_test", "orderId": Uuid::now_v7() }))
            .send(&make_service(orders))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert!(!body.success);

        Ok((res.status_code.unwrap_or(StatusCode::OK), body.message))
    }

    #[tokio::test]
    async fn test_capture_payment_success() -> TestResult {
        let uuid = OrderUuid::new();
        let order = make_confirmed_order(uuid, UserUuid::new());

        let mut orders = MockOrdersService::new();

        orders
            .expect_capture_payment()
            .once()
            .withf(move |capture| {
                capture.order_uuid == uuid && capture.payment_intent_id == "pi_test"
            })
            .return_once(move |_| Ok(order));

        orders.expect_create_order().never();

        let mut res = TestClient::post("http://example.com/order/capture")
            .json(&json!({ "paymentIntentId": "pi_test", "orderId": uuid.into_uuid() }))
            .send(&make_service(orders))
            .await;

        let body: PaymentCapturedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);
        assert!(body.cart_cleared);
        assert_eq!(body.message, CAPTURED_MESSAGE);
        assert_eq!(body.order_status, "confirmed");
        assert_eq!(body.data.id, uuid.into_uuid());
        assert_eq!(body.data.payment_status, "paid");

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_unknown_order_returns_404() -> TestResult {
        let (status, message) = capture_with_error(OrdersServiceError::NotFound).await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Order can not be found");

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_insufficient_stock_returns_400() -> TestResult {
        let (status, message) =
            capture_with_error(OrdersServiceError::InsufficientStock("Blue Shirt".to_string()))
                .await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Not enough stock for product: Blue Shirt");

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_missing_product_returns_404() -> TestResult {
        let (status, message) = capture_with_error(OrdersServiceError::OrderedProductMissing(
            "Blue Shirt".to_string(),
        ))
        .await?;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(message, "Product not found: Blue Shirt");

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_without_order_id_returns_json_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_capture_payment().never();

        let mut res = TestClient::post("http://example.com/order/capture")
            .json(&json!({ "paymentIntentId": "pi_test" }))
            .send(&make_service(orders))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(!body.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_declined_payment_returns_400() -> TestResult {
        let (status, message) = capture_with_error(OrdersServiceError::PaymentFailed).await?;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message, "Payment failed");

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_twice_returns_409() -> TestResult {
        let (status, _) = capture_with_error(OrdersServiceError::AlreadyCaptured).await?;

        assert_eq!(status, StatusCode::CONFLICT);

        Ok(())
    }

    #[tokio::test]
    async fn test_capture_gateway_failure_returns_500() -> TestResult {
        let (status, message) = capture_with_error(OrdersServiceError::Payment(
            PaymentError::Gateway("timeout".to_string()),
        ))
        .await?;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Some error occurred!");

        Ok(())
    }
}
