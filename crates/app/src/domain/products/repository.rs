//! Products Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::products::models::{NewProduct, Product, ProductUuid},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const LOCK_PRODUCT_SQL: &str = include_str!("sql/lock_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");
const DECREMENT_PRODUCT_STOCK_SQL: &str = include_str!("sql/decrement_product_stock.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgProductsRepository;

impl PgProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch a product and hold its row lock until the transaction ends.
    pub(crate) async fn lock_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
    ) -> Result<Option<Product>, sqlx::Error> {
        query_as::<Postgres, Product>(LOCK_PRODUCT_SQL)
            .bind(product.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: NewProduct,
    ) -> Result<Product, sqlx::Error> {
        query_as::<Postgres, Product>(CREATE_PRODUCT_SQL)
            .bind(product.uuid.into_uuid())
            .bind(product.title)
            .bind(product.image)
            .bind(amount_to_i64(product.price, "price")?)
            .bind(amount_to_i64(product.sale_price, "sale_price")?)
            .bind(amount_to_i64(product.total_stock, "total_stock")?)
            .fetch_one(&mut **tx)
            .await
    }

    /// Remove `quantity` units from stock, refusing to go below zero.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        quantity: u64,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_PRODUCT_STOCK_SQL)
            .bind(product.into_uuid())
            .bind(amount_to_i64(quantity, "total_stock")?)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ProductUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            image: row.try_get("image")?,
            price: try_get_amount(row, "price")?,
            sale_price: try_get_amount(row, "sale_price")?,
            total_stock: try_get_amount(row, "total_stock")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
