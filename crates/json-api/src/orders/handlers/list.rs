//! List User Orders Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{orders::models::Order, users::UserUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::lookup_error, responses::OrderResponse},
    state::State,
};

/// Orders Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub success: bool,

    /// The user's orders, newest first
    pub data: Vec<OrderResponse>,
}

/// List User Orders Handler
#[endpoint(
    tags("orders"),
    summary = "List User Orders",
    responses(
        (status_code = StatusCode::OK, description = "Orders found"),
        (status_code = StatusCode::NOT_FOUND, description = "No orders found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    user: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let orders = list_user_orders(state, UserUuid::from_uuid(user.into_inner())).await?;

    Ok(Json(OrdersResponse {
        success: true,
        data: orders.into_iter().map(OrderResponse::from).collect(),
    }))
}

#[tracing::instrument(name = "orders.list", skip_all, fields(user_uuid = %user))]
async fn list_user_orders(state: &State, user: UserUuid) -> Result<Vec<Order>, ApiError> {
    let orders = state
        .app
        .orders
        .list_user_orders(user)
        .await
        .map_err(|error| lookup_error(error, "No orders found!"))?;

    if orders.is_empty() {
        return Err(ApiError::not_found("No orders found!"));
    }

    Ok(orders)
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use storefront_app::domain::orders::{MockOrdersService, OrdersServiceError, models::OrderUuid};

    use crate::{
        errors::ErrorResponse,
        test_helpers::{make_confirmed_order, make_order, orders_service},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("order/list/{user}").get(handler))
    }

    #[tokio::test]
    async fn test_list_user_orders_success() -> TestResult {
        let user = UserUuid::new();
        let newer = OrderUuid::new();
        let older = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_user_orders()
            .once()
            .withf(move |u| *u == user)
            .return_once(move |u| Ok(vec![make_order(newer, u), make_confirmed_order(older, u)]));

        orders.expect_get_order().never();

        let mut res = TestClient::get(format!("http://example.com/order/list/{user}"))
            .send(&make_service(orders))
            .await;

        let body: OrdersResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.success);
        assert_eq!(
            body.data.iter().map(|o| o.id).collect::<Vec<_>>(),
            vec![newer.into_uuid(), older.into_uuid()]
        );
        assert!(body.data.iter().all(|o| o.user_id == user.into_uuid()));

        Ok(())
    }

    #[tokio::test]
    async fn test_list_user_orders_empty_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_user_orders()
            .once()
            .return_once(|_| Ok(Vec::new()));

        let mut res = TestClient::get(format!("http://example.com/order/list/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.message, "No orders found!");

        Ok(())
    }

    #[tokio::test]
    async fn test_list_user_orders_failure_returns_500() {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_user_orders()
            .once()
            .return_once(|_| Err(OrdersServiceError::InvalidData));

        let res = TestClient::get(format!("http://example.com/order/list/{}", Uuid::now_v7()))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn test_list_user_orders_invalid_uuid_returns_json_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_user_orders().never();

        let mut res = TestClient::get("http://example.com/order/list/not-a-uuid")
            .send(&make_service(orders))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(!body.success);
        assert!(
            body.message.starts_with("Invalid request: "),
            "unexpected message {:?}",
            body.message
        );

        Ok(())
    }
}
