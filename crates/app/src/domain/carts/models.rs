//! Cart Models

use jiff::Timestamp;

use crate::{
    domain::{products::models::ProductUuid, users::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<Cart>;

/// Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
    pub items: Vec<CartItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// New Cart Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,
    pub user_uuid: Option<UserUuid>,
}

/// CartItem Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
