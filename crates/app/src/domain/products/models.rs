//! Product Models

use jiff::Timestamp;
use storefront::prices::Price;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub uuid: ProductUuid,
    pub title: String,
    pub image: Option<String>,
    pub price: u64,
    pub sale_price: u64,
    pub total_stock: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl Product {
    /// The unit price charged for this product right now.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        Price::effective(self.price, self.sale_price)
    }
}

/// New Product Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub title: String,
    pub image: Option<String>,
    pub price: u64,
    pub sale_price: u64,
    pub total_stock: u64,
}
