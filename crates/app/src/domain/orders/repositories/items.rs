//! Order Items Repository

use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use uuid::Uuid;

use crate::{
    database::{amount_to_i64, quantity_to_i32, try_get_amount, try_get_quantity},
    domain::{
        orders::models::{OrderItem, OrderUuid},
        products::models::ProductUuid,
    },
};

const CREATE_ORDER_ITEM_SQL: &str = include_str!("../sql/create_order_item.sql");
const GET_ORDER_ITEMS_SQL: &str = include_str!("../sql/get_order_items.sql");

/// An order line together with the order it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StoredOrderItem {
    pub order_uuid: OrderUuid,
    pub item: OrderItem,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrderItemsRepository;

impl PgOrderItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        items: &[OrderItem],
    ) -> Result<Vec<OrderItem>, sqlx::Error> {
        let mut created = Vec::with_capacity(items.len());

        for (position, item) in items.iter().enumerate() {
            let position = i32::try_from(position).map_err(|e| sqlx::Error::ColumnDecode {
                index: "position".to_string(),
                source: Box::new(e),
            })?;

            let stored = query_as::<Postgres, StoredOrderItem>(CREATE_ORDER_ITEM_SQL)
                .bind(order.into_uuid())
                .bind(position)
                .bind(item.product_uuid.into_uuid())
                .bind(&item.title)
                .bind(item.image.as_deref())
                .bind(amount_to_i64(item.price, "price")?)
                .bind(quantity_to_i32(item.quantity, "quantity")?)
                .fetch_one(&mut **tx)
                .await?;

            created.push(stored.item);
        }

        Ok(created)
    }

    /// Items for the given orders, in line order within each order.
    pub(crate) async fn get_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<StoredOrderItem>, sqlx::Error> {
        let uuids: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        query_as::<Postgres, StoredOrderItem>(GET_ORDER_ITEMS_SQL)
            .bind(uuids)
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for StoredOrderItem {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            item: OrderItem {
                product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
                title: row.try_get("title")?,
                image: row.try_get("image")?,
                price: try_get_amount(row, "price")?,
                quantity: try_get_quantity(row, "quantity")?,
            },
        })
    }
}
