//! Carts Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    carts::models::{Cart, CartUuid, NewCart},
    users::UserUuid,
};

const GET_CART_SQL: &str = include_str!("../sql/get_cart.sql");
const LOCK_CART_SQL: &str = include_str!("../sql/lock_cart.sql");
const CREATE_CART_SQL: &str = include_str!("../sql/create_cart.sql");
const TOUCH_CART_SQL: &str = include_str!("../sql/touch_cart.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(GET_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch a cart and hold its row lock until the transaction ends.
    pub(crate) async fn lock_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Option<Cart>, sqlx::Error> {
        query_as::<Postgres, Cart>(LOCK_CART_SQL)
            .bind(cart.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: NewCart,
    ) -> Result<Cart, sqlx::Error> {
        query_as::<Postgres, Cart>(CREATE_CART_SQL)
            .bind(cart.uuid.into_uuid())
            .bind(cart.user_uuid.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn touch_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(TOUCH_CART_SQL)
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Cart {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: row
                .try_get::<Option<Uuid>, _>("user_uuid")?
                .map(UserUuid::from_uuid),
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
