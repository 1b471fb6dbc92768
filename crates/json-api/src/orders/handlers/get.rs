//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{Order, OrderUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::lookup_error, responses::OrderResponse},
    state::State,
};

/// Order Details Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailsResponse {
    pub success: bool,
    pub data: OrderResponse,
}

/// Get Order Handler
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    responses(
        (status_code = StatusCode::OK, description = "Order found"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let order = get_order(state, OrderUuid::from_uuid(order.into_inner())).await?;

    Ok(Json(OrderDetailsResponse {
        success: true,
        data: order.into(),
    }))
}

#[tracing::instrument(name = "orders.get", skip_all, fields(order_uuid = %order))]
async fn get_order(state: &State, order: OrderUuid) -> Result<Order, ApiError> {
    state
        .app
        .orders
        .get_order(order)
        .await
        .map_err(|error| lookup_error(error, "Order not found!"))
}
