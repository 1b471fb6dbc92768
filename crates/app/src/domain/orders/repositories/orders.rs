//! Orders Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use storefront::orders::{OrderState, OrderStatus, PaymentStatus};

use crate::{
    database::{amount_to_i64, try_get_amount},
    domain::{
        carts::models::CartUuid,
        orders::models::{AddressInfo, Order, OrderUuid, PAYMENT_METHOD},
        users::UserUuid,
    },
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_USER_ORDERS_SQL: &str = include_str!("../sql/list_user_orders.sql");
const CONFIRM_ORDER_SQL: &str = include_str!("../sql/confirm_order.sql");

/// Pending order row as written at creation time.
#[derive(Debug, Clone)]
pub(crate) struct NewOrderRecord<'a> {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub cart_uuid: CartUuid,
    pub address: &'a AddressInfo,
    pub total_amount: u64,
    pub currency: &'a str,
    pub payment_id: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: NewOrderRecord<'_>,
    ) -> Result<Order, sqlx::Error> {
        let state = OrderState::PENDING;

        query_as::<Postgres, Order>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.user_uuid.into_uuid())
            .bind(order.cart_uuid.into_uuid())
            .bind(state.order.as_str())
            .bind(state.payment.as_str())
            .bind(PAYMENT_METHOD)
            .bind(order.payment_id)
            .bind(None::<String>)
            .bind(amount_to_i64(order.total_amount, "total_amount")?)
            .bind(order.currency)
            .bind(order.address.address_id.as_deref())
            .bind(order.address.address.as_deref())
            .bind(order.address.city.as_deref())
            .bind(order.address.pincode.as_deref())
            .bind(order.address.phone.as_deref())
            .bind(order.address.notes.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Fetch an order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Orders placed by a user, newest first.
    pub(crate) async fn list_user_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<Order>, sqlx::Error> {
        query_as::<Postgres, Order>(LIST_USER_ORDERS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn confirm_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        state: OrderState,
        payment_id: &str,
    ) -> Result<Order, sqlx::Error> {
        query_as::<Postgres, Order>(CONFIRM_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(state.order.as_str())
            .bind(state.payment.as_str())
            .bind(payment_id)
            .fetch_one(&mut **tx)
            .await
    }
}

fn try_get_status<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Order {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            cart_uuid: CartUuid::from_uuid(row.try_get("cart_uuid")?),
            items: Vec::new(),
            address: AddressInfo {
                address_id: row.try_get("address_id")?,
                address: row.try_get("address")?,
                city: row.try_get("city")?,
                pincode: row.try_get("pincode")?,
                phone: row.try_get("phone")?,
                notes: row.try_get("notes")?,
            },
            order_status: try_get_status::<OrderStatus>(row, "order_status")?,
            payment_status: try_get_status::<PaymentStatus>(row, "payment_status")?,
            payment_method: row.try_get("payment_method")?,
            payment_id: row.try_get("payment_id")?,
            payer_id: row.try_get("payer_id")?,
            total_amount: try_get_amount(row, "total_amount")?,
            currency: row.try_get("currency")?,
            order_date: row.try_get::<SqlxTimestamp, _>("order_date")?.to_jiff(),
            order_update_date: row
                .try_get::<SqlxTimestamp, _>("order_update_date")?
                .to_jiff(),
        })
    }
}
