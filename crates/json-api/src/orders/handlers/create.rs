//! Create Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::orders::models::{CreatedOrder, NewOrder};

use crate::{
    errors::ApiError,
    extensions::*,
    observability::record_order_created,
    orders::{errors::create_order_error, requests::CreateOrderRequest},
    state::State,
};

/// Order Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderCreatedResponse {
    pub success: bool,

    /// Secret the client uses to complete payment
    pub client_secret: String,

    /// Created order id
    pub order_id: Uuid,

    /// Payment intent to pass back when capturing
    pub payment_intent_id: String,
}

impl From<CreatedOrder> for OrderCreatedResponse {
    fn from(created: CreatedOrder) -> Self {
        Self {
            success: true,
            client_secret: created.client_secret,
            order_id: created.order.uuid.into_uuid(),
            payment_intent_id: created.payment_intent_id,
        }
    }
}

/// Create Order Handler
///
/// Prices the submitted items against the catalogue, opens a payment intent and stores a
/// pending order.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    responses(
        (status_code = StatusCode::CREATED, description = "Order created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid payload or total amount mismatch"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderCreatedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let created = create_order(state, json.into_inner()).await?;

    res.add_header(
        LOCATION,
        format!("/order/details/{}", created.order.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(created.into()))
}

#[tracing::instrument(
    name = "orders.create",
    skip_all,
    fields(user_uuid = %request.user_id, cart_uuid = %request.cart_id, order_uuid)
)]
async fn create_order(
    state: &State,
    request: CreateOrderRequest,
) -> Result<CreatedOrder, ApiError> {
    let order = NewOrder::try_from(request)?;

    tracing::Span::current().record("order_uuid", tracing::field::display(order.uuid));

    let created = state
        .app
        .orders
        .create_order(order)
        .await
        .map_err(create_order_error)?;

    record_order_created();

    Ok(created)
}
