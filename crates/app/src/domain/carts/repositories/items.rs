//! Cart Items Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{quantity_to_i32, try_get_quantity},
    domain::{
        carts::models::{CartItem, CartUuid},
        products::models::ProductUuid,
    },
};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const SET_CART_ITEM_SQL: &str = include_str!("../sql/set_cart_item.sql");
const CLEAR_CART_ITEMS_SQL: &str = include_str!("../sql/clear_cart_items.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CartItem>, sqlx::Error> {
        query_as::<Postgres, CartItem>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, sqlx::Error> {
        query_as::<Postgres, CartItem>(SET_CART_ITEM_SQL)
            .bind(cart.into_uuid())
            .bind(product.into_uuid())
            .bind(quantity_to_i32(quantity, "quantity")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Remove every item from the cart, returning how many were removed.
    pub(crate) async fn clear_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            quantity: try_get_quantity(row, "quantity")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
