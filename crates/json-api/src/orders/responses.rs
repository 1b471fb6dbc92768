//! Order response bodies.

use rust_decimal::prelude::ToPrimitive;
use rusty_money::iso;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use storefront::pricing::to_major_units;
use storefront_app::domain::orders::models::{AddressInfo, Order, OrderItem};

/// Order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub cart_id: Uuid,
    pub cart_items: Vec<OrderItemResponse>,
    pub address_info: AddressInfoBody,
    /// `pending` or `confirmed`
    pub order_status: String,
    pub payment_method: String,
    /// `pending` or `paid`
    pub payment_status: String,
    /// Total in major currency units.
    pub total_amount: f64,
    pub order_date: String,
    pub order_update_date: String,
    pub payment_id: Option<String>,
    pub payer_id: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        let currency = order.currency.clone();

        Self {
            id: order.uuid.into_uuid(),
            user_id: order.user_uuid.into_uuid(),
            cart_id: order.cart_uuid.into_uuid(),
            cart_items: order
                .items
                .into_iter()
                .map(|item| OrderItemResponse::from_item(item, &currency))
                .collect(),
            address_info: order.address.into(),
            order_status: order.order_status.to_string(),
            payment_method: order.payment_method,
            payment_status: order.payment_status.to_string(),
            total_amount: major_units(order.total_amount, &currency),
            order_date: order.order_date.to_string(),
            order_update_date: order.order_update_date.to_string(),
            payment_id: order.payment_id,
            payer_id: order.payer_id,
        }
    }
}

/// Order line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderItemResponse {
    pub product_id: Uuid,
    pub title: String,
    pub image: Option<String>,
    /// Unit price in major currency units.
    pub price: f64,
    pub quantity: u32,
}

impl OrderItemResponse {
    fn from_item(item: OrderItem, currency: &str) -> Self {
        Self {
            product_id: item.product_uuid.into_uuid(),
            title: item.title,
            image: item.image,
            price: major_units(item.price, currency),
            quantity: item.quantity,
        }
    }
}

/// Delivery address, shared by requests and responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AddressInfoBody {
    pub address_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl From<AddressInfo> for AddressInfoBody {
    fn from(address: AddressInfo) -> Self {
        Self {
            address_id: address.address_id,
            address: address.address,
            city: address.city,
            pincode: address.pincode,
            phone: address.phone,
            notes: address.notes,
        }
    }
}

impl From<AddressInfoBody> for AddressInfo {
    fn from(address: AddressInfoBody) -> Self {
        Self {
            address_id: address.address_id,
            address: address.address,
            city: address.city,
            pincode: address.pincode,
            phone: address.phone,
            notes: address.notes,
        }
    }
}

/// Minor units of `currency_code` as a major-unit number, e.g. `10050` USD is `100.5`.
fn major_units(minor: u64, currency_code: &str) -> f64 {
    let currency = iso::find(currency_code).unwrap_or(iso::USD);

    to_major_units(minor, currency).to_f64().unwrap_or_default()
}
