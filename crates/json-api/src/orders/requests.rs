//! Order request bodies and their validation.

use rust_decimal::Decimal;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront_app::domain::{
    carts::models::CartUuid,
    orders::models::{NewOrder, NewOrderItem, OrderUuid, PaymentCapture},
    products::models::ProductUuid,
    users::UserUuid,
};

use crate::{errors::ApiError, orders::responses::AddressInfoBody};

/// Create Order Request
///
/// Line item titles, images and prices sent by clients are ignored; they are read from the
/// product catalogue instead.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateOrderRequest {
    pub user_id: Uuid,
    pub cart_id: Uuid,
    pub cart_items: Vec<CartItemRequest>,
    #[serde(default)]
    pub address_info: AddressInfoBody,
    /// Total the client expects to pay, in major currency units.
    pub total_amount: f64,
}

/// Order line as submitted by the client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
}

impl TryFrom<CreateOrderRequest> for NewOrder {
    type Error = ApiError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        if request.cart_items.is_empty() {
            return Err(ApiError::bad_request("Order must contain at least one item"));
        }

        if request.cart_items.iter().any(|item| item.quantity == 0) {
            return Err(ApiError::bad_request("Item quantities must be positive"));
        }

        // Order lines store quantities as INTEGER.
        if request
            .cart_items
            .iter()
            .any(|item| i32::try_from(item.quantity).is_err())
        {
            return Err(ApiError::bad_request("Item quantity is too large"));
        }

        let declared_total = Decimal::try_from(request.total_amount)
            .ok()
            .filter(|total| !total.is_sign_negative())
            .ok_or_else(|| ApiError::bad_request("Total amount must be a non-negative number"))?;

        Ok(NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: UserUuid::from_uuid(request.user_id),
            cart_uuid: CartUuid::from_uuid(request.cart_id),
            items: request
                .cart_items
                .into_iter()
                .map(|item| NewOrderItem {
                    product_uuid: ProductUuid::from_uuid(item.product_id),
                    quantity: item.quantity,
                })
                .collect(),
            address: request.address_info.into(),
            declared_total,
        })
    }
}

/// Capture Payment Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CapturePaymentRequest {
    pub payment_intent_id: String,
    pub order_id: Uuid,
}

impl From<CapturePaymentRequest> for PaymentCapture {
    fn from(request: CapturePaymentRequest) -> Self {
        PaymentCapture {
            payment_intent_id: request.payment_intent_id,
            order_uuid: OrderUuid::from_uuid(request.order_id),
        }
    }
}
