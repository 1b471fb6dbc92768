//! Order Models

use jiff::Timestamp;
use rust_decimal::Decimal;
use storefront::orders::{OrderState, OrderStatus, PaymentStatus};

use crate::{
    domain::{carts::models::CartUuid, products::models::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Payment method recorded against every order.
pub const PAYMENT_METHOD: &str = "stripe";

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub cart_uuid: CartUuid,
    pub items: Vec<OrderItem>,
    pub address: AddressInfo,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: String,
    pub payment_id: Option<String>,
    pub payer_id: Option<String>,
    /// Total in minor currency units.
    pub total_amount: u64,
    pub currency: String,
    pub order_date: Timestamp,
    pub order_update_date: Timestamp,
}

impl Order {
    #[must_use]
    pub fn state(&self) -> OrderState {
        OrderState {
            order: self.order_status,
            payment: self.payment_status,
        }
    }
}

/// Order line snapshot, taken from the product record when the order was placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub product_uuid: ProductUuid,
    pub title: String,
    pub image: Option<String>,
    /// Unit price in minor currency units.
    pub price: u64,
    pub quantity: u32,
}

/// Delivery address snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressInfo {
    pub address_id: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub cart_uuid: CartUuid,
    pub items: Vec<NewOrderItem>,
    pub address: AddressInfo,
    /// Total the client expects to pay, in major currency units.
    pub declared_total: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrderItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

/// A persisted pending order together with its payment intent.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedOrder {
    pub order: Order,
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// Request to capture payment for an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCapture {
    pub payment_intent_id: String,
    pub order_uuid: OrderUuid,
}
