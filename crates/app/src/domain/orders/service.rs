//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use rusty_money::iso::Currency;
use storefront::{
    pricing::{PricedLine, PricingError, order_total, to_minor_units, verify_declared_total},
    stock::{StockRequest, plan_stock_decrements},
};
use tracing::{info, warn};

use crate::{
    database::Db,
    domain::{
        carts::repositories::{PgCartItemsRepository, PgCartsRepository},
        orders::{
            errors::OrdersServiceError,
            models::{CreatedOrder, NewOrder, Order, OrderItem, OrderUuid, PaymentCapture},
            repositories::{NewOrderRecord, PgOrderItemsRepository, PgOrdersRepository},
        },
        products::{
            models::{Product, ProductUuid},
            repository::PgProductsRepository,
        },
        users::UserUuid,
    },
    payments::{NewPaymentIntent, PaymentGateway, models::PaymentMetadata},
};

#[derive(Clone)]
pub struct PgOrdersService {
    db: Db,
    gateway: Arc<dyn PaymentGateway>,
    currency: &'static Currency,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    products_repository: PgProductsRepository,
    carts_repository: PgCartsRepository,
    cart_items_repository: PgCartItemsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db, gateway: Arc<dyn PaymentGateway>, currency: &'static Currency) -> Self {
        Self {
            db,
            gateway,
            currency,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            carts_repository: PgCartsRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
        }
    }

    async fn with_items(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        mut orders: Vec<Order>,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        for stored in self.items_repository.get_order_items(tx, &uuids).await? {
            if let Some(order) = orders.iter_mut().find(|o| o.uuid == stored.order_uuid) {
                order.items.push(stored.item);
            }
        }

        Ok(orders)
    }
}

impl std::fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("currency", &self.currency.iso_alpha_code)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut lines = Vec::with_capacity(order.items.len());
        let mut items = Vec::with_capacity(order.items.len());

        for item in &order.items {
            let product = self
                .products_repository
                .get_product(&mut tx, item.product_uuid)
                .await?
                .ok_or(OrdersServiceError::ProductNotFound(item.product_uuid))?;

            let unit_price = product.effective_price();

            lines.push(PricedLine::new(unit_price, item.quantity));

            items.push(OrderItem {
                product_uuid: product.uuid,
                title: product.title,
                image: product.image,
                price: *unit_price,
                quantity: item.quantity,
            });
        }

        tx.commit().await?;

        let total = order_total(&lines, self.currency)?;

        verify_declared_total(order.declared_total, &total)?;

        let amount = to_minor_units(&total)?;
        let total_amount = u64::try_from(amount)
            .map_err(|_negative| OrdersServiceError::Pricing(PricingError::Overflow))?;

        let intent = self
            .gateway
            .create_payment_intent(NewPaymentIntent {
                amount,
                currency: self.currency.iso_alpha_code.to_lowercase(),
                metadata: PaymentMetadata {
                    user_uuid: order.user_uuid.into_uuid(),
                },
            })
            .await?;

        let mut tx = self.db.begin().await?;

        let mut created = self
            .orders_repository
            .create_order(
                &mut tx,
                NewOrderRecord {
                    uuid: order.uuid,
                    user_uuid: order.user_uuid,
                    cart_uuid: order.cart_uuid,
                    address: &order.address,
                    total_amount,
                    currency: self.currency.iso_alpha_code,
                    payment_id: &intent.id,
                },
            )
            .await?;

        created.items = self
            .items_repository
            .create_order_items(&mut tx, created.uuid, &items)
            .await?;

        tx.commit().await?;

        info!(
            order_uuid = %created.uuid,
            user_uuid = %created.user_uuid,
            total_amount,
            payment_intent_id = %intent.id,
            "created pending order"
        );

        Ok(CreatedOrder {
            order: created,
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
        })
    }

    async fn capture_payment(&self, capture: PaymentCapture) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .orders_repository
            .lock_order(&mut tx, capture.order_uuid)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let confirmed_state = order.state().confirm()?;

        let confirmation = self
            .gateway
            .confirm_payment(&capture.payment_intent_id)
            .await?;

        if !confirmation.succeeded() {
            warn!(
                order_uuid = %order.uuid,
                payment_intent_id = %capture.payment_intent_id,
                status = %confirmation.status,
                "payment confirmation did not succeed"
            );

            return Err(OrdersServiceError::PaymentFailed);
        }

        let items: Vec<OrderItem> = self
            .items_repository
            .get_order_items(&mut tx, &[order.uuid])
            .await?
            .into_iter()
            .map(|stored| stored.item)
            .collect();

        // Lock in a stable order so concurrent captures sharing products cannot deadlock.
        let mut product_uuids: Vec<ProductUuid> =
            items.iter().map(|item| item.product_uuid).collect();
        product_uuids.sort_unstable();
        product_uuids.dedup();

        let mut products: Vec<Product> = Vec::with_capacity(product_uuids.len());

        let missing = |uuid: ProductUuid| {
            OrdersServiceError::OrderedProductMissing(
                items
                    .iter()
                    .find(|item| item.product_uuid == uuid)
                    .map(|item| item.title.clone())
                    .unwrap_or_default(),
            )
        };

        for uuid in product_uuids {
            let product = self
                .products_repository
                .lock_product(&mut tx, uuid)
                .await?
                .ok_or_else(|| missing(uuid))?;

            products.push(product);
        }

        let requests = items
            .iter()
            .map(|item| {
                products
                    .iter()
                    .find(|product| product.uuid == item.product_uuid)
                    .map(|product| StockRequest {
                        product: product.uuid,
                        title: product.title.clone(),
                        requested: item.quantity,
                        available: product.total_stock,
                    })
                    .ok_or_else(|| missing(item.product_uuid))
            })
            .collect::<Result<Vec<_>, _>>()?;

        for decrement in plan_stock_decrements(&requests)? {
            let updated = self
                .products_repository
                .decrement_stock(&mut tx, decrement.product, decrement.quantity)
                .await?;

            if updated == 0 {
                return Err(missing(decrement.product));
            }
        }

        let cart_cleared = match self
            .carts_repository
            .lock_cart(&mut tx, order.cart_uuid)
            .await?
        {
            Some(cart) => {
                self.cart_items_repository
                    .clear_cart_items(&mut tx, cart.uuid)
                    .await?;
                self.carts_repository.touch_cart(&mut tx, cart.uuid).await?;

                true
            }
            None => false,
        };

        let mut confirmed = self
            .orders_repository
            .confirm_order(&mut tx, order.uuid, confirmed_state, &confirmation.id)
            .await?;

        confirmed.items = items;

        tx.commit().await?;

        info!(
            order_uuid = %confirmed.uuid,
            payment_id = %confirmation.id,
            cart_cleared,
            "captured payment and confirmed order"
        );

        Ok(confirmed)
    }

    async fn list_user_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let orders = self.orders_repository.list_user_orders(&mut tx, user).await?;
        let orders = self.with_items(&mut tx, orders).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self
            .orders_repository
            .get_order(&mut tx, order)
            .await?
            .ok_or(OrdersServiceError::NotFound)?;

        let order = self
            .with_items(&mut tx, vec![order])
            .await?
            .pop()
            .ok_or(OrdersServiceError::NotFound)?;

        tx.commit().await?;

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Price the order against current product records, open a payment intent and persist
    /// the order as pending.
    ///
    /// Products and carts are never modified.
    async fn create_order(&self, order: NewOrder) -> Result<CreatedOrder, OrdersServiceError>;

    /// Confirm the payment intent and, atomically, take stock for every line, clear the
    /// order's cart and mark the order confirmed and paid.
    async fn capture_payment(&self, capture: PaymentCapture) -> Result<Order, OrdersServiceError>;

    /// Orders placed by a user, newest first. An empty list is not an error.
    async fn list_user_orders(&self, user: UserUuid) -> Result<Vec<Order>, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(&self, order: OrderUuid) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use storefront::orders::{OrderStatus, PaymentStatus};
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::{CartsService, models::CartUuid},
            orders::models::{AddressInfo, NewOrderItem, PAYMENT_METHOD},
            products::ProductsService,
        },
        payments::PaymentFailureMode,
        test::{
            TestContext,
            helpers::{new_product, seed_cart},
        },
    };

    use super::*;

    fn new_order(
        user: UserUuid,
        cart: CartUuid,
        items: &[(ProductUuid, u32)],
        total: Decimal,
    ) -> NewOrder {
        NewOrder {
            uuid: OrderUuid::new(),
            user_uuid: user,
            cart_uuid: cart,
            items: items
                .iter()
                .map(|&(product_uuid, quantity)| NewOrderItem {
                    product_uuid,
                    quantity,
                })
                .collect(),
            address: AddressInfo {
                address: Some("1 High Street".to_string()),
                city: Some("Springfield".to_string()),
                pincode: Some("12345".to_string()),
                phone: Some("555-0100".to_string()),
                ..AddressInfo::default()
            },
            declared_total: total,
        }
    }

    fn dollars(amount: i64) -> Decimal {
        Decimal::new(amount * 100, 2)
    }

    #[tokio::test]
    async fn create_order_persists_pending_order() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let cart = seed_cart(&ctx, user, &[(product, 2)]).await?;

        let created = ctx
            .orders
            .create_order(new_order(user, cart, &[(product, 2)], dollars(100)))
            .await?;

        assert!(created.payment_intent_id.starts_with("pi_"));
        assert!(created.client_secret.starts_with(&created.payment_intent_id));

        let order = created.order;

        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(order.payment_method, PAYMENT_METHOD);
        assert_eq!(order.payment_id.as_deref(), Some(created.payment_intent_id.as_str()));
        assert_eq!(order.payer_id, None);
        assert_eq!(order.total_amount, 100_00);
        assert_eq!(order.currency, "USD");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items.first().map(|i| i.price), Some(50_00));
        assert_eq!(order.address.city.as_deref(), Some("Springfield"));

        let fetched = ctx.orders.get_order(order.uuid).await?;

        assert_eq!(fetched, order);

        Ok(())
    }

    #[tokio::test]
    async fn create_order_uses_sale_price_and_product_snapshot() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        let mut seeded = new_product(product, 50_00, 10);
        seeded.sale_price = 40_00;
        seeded.title = "Linen Shirt".to_string();
        seeded.image = Some("https://cdn.example.test/linen.png".to_string());

        ctx.products.create_product(seeded).await?;

        let created = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 2)], dollars(80)))
            .await?;

        let item = created.order.items.first().cloned();

        assert_eq!(
            item,
            Some(OrderItem {
                product_uuid: product,
                title: "Linen Shirt".to_string(),
                image: Some("https://cdn.example.test/linen.png".to_string()),
                price: 40_00,
                quantity: 2,
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_wrong_total_is_rejected_and_not_persisted() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let result = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 2)], dollars(150)))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::AmountMismatch { .. })),
            "expected AmountMismatch, got {result:?}"
        );

        assert!(ctx.orders.list_user_orders(user).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn create_order_with_unknown_product_returns_product_not_found() {
        let ctx = TestContext::new().await;
        let missing = ProductUuid::new();

        let result = ctx
            .orders
            .create_order(new_order(
                UserUuid::new(),
                CartUuid::new(),
                &[(missing, 1)],
                dollars(10),
            ))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::ProductNotFound(uuid)) if uuid == missing),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_order_does_not_touch_stock_or_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let cart = seed_cart(&ctx, user, &[(product, 2)]).await?;

        ctx.orders
            .create_order(new_order(user, cart, &[(product, 2)], dollars(100)))
            .await?;

        assert_eq!(ctx.products.get_product(product).await?.total_stock, 10);
        assert_eq!(ctx.carts.get_cart(cart).await?.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn capture_confirms_order_takes_stock_and_clears_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let cart = seed_cart(&ctx, user, &[(product, 2)]).await?;

        let created = ctx
            .orders
            .create_order(new_order(user, cart, &[(product, 2)], dollars(100)))
            .await?;

        let captured = ctx
            .orders
            .capture_payment(PaymentCapture {
                payment_intent_id: created.payment_intent_id.clone(),
                order_uuid: created.order.uuid,
            })
            .await?;

        assert_eq!(captured.order_status, OrderStatus::Confirmed);
        assert_eq!(captured.payment_status, PaymentStatus::Paid);
        assert_eq!(captured.payment_id, Some(created.payment_intent_id));
        assert_eq!(captured.items, created.order.items);
        assert!(captured.order_update_date >= created.order.order_update_date);

        assert_eq!(ctx.products.get_product(product).await?.total_stock, 8);
        assert!(ctx.carts.get_cart(cart).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn capture_succeeds_when_cart_no_longer_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let created = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 1)], dollars(50)))
            .await?;

        let captured = ctx
            .orders
            .capture_payment(PaymentCapture {
                payment_intent_id: created.payment_intent_id,
                order_uuid: created.order.uuid,
            })
            .await?;

        assert_eq!(captured.order_status, OrderStatus::Confirmed);
        assert_eq!(ctx.products.get_product(product).await?.total_stock, 9);

        Ok(())
    }

    #[tokio::test]
    async fn capture_with_insufficient_stock_leaves_everything_untouched() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let plentiful = ProductUuid::new();
        let scarce = ProductUuid::new();

        ctx.products
            .create_product(new_product(plentiful, 10_00, 20))
            .await?;
        ctx.products
            .create_product(new_product(scarce, 50_00, 5))
            .await?;

        let cart = seed_cart(&ctx, user, &[(plentiful, 1), (scarce, 10)]).await?;

        let created = ctx
            .orders
            .create_order(new_order(
                user,
                cart,
                &[(plentiful, 1), (scarce, 10)],
                dollars(510),
            ))
            .await?;

        let result = ctx
            .orders
            .capture_payment(PaymentCapture {
                payment_intent_id: created.payment_intent_id,
                order_uuid: created.order.uuid,
            })
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::InsufficientStock(ref title)) if title == "Product"),
            "expected InsufficientStock, got {result:?}"
        );

        let order = ctx.orders.get_order(created.order.uuid).await?;

        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert_eq!(ctx.products.get_product(plentiful).await?.total_stock, 20);
        assert_eq!(ctx.products.get_product(scarce).await?.total_stock, 5);
        assert_eq!(ctx.carts.get_cart(cart).await?.items.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn capture_of_removed_product_names_the_line_and_leaves_order_pending() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let created = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 2)], dollars(100)))
            .await?;

        sqlx::query("UPDATE products SET deleted_at = now() WHERE uuid = $1")
            .bind(product.into_uuid())
            .execute(ctx.db.pool())
            .await?;

        let result = ctx
            .orders
            .capture_payment(PaymentCapture {
                payment_intent_id: created.payment_intent_id,
                order_uuid: created.order.uuid,
            })
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::OrderedProductMissing(ref title)) if title == "Product"),
            "expected OrderedProductMissing, got {result:?}"
        );

        let order = ctx.orders.get_order(created.order.uuid).await?;

        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);

        Ok(())
    }

    #[tokio::test]
    async fn capture_unknown_order_returns_not_found() {
        let ctx = TestContext::new().await;

        for intent in ["", "pi_missing"] {
            let result = ctx
                .orders
                .capture_payment(PaymentCapture {
                    payment_intent_id: intent.to_string(),
                    order_uuid: OrderUuid::new(),
                })
                .await;

            assert!(
                matches!(result, Err(OrdersServiceError::NotFound)),
                "expected NotFound, got {result:?}"
            );
        }
    }

    #[tokio::test]
    async fn capture_twice_returns_already_captured() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let created = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 2)], dollars(100)))
            .await?;

        let capture = PaymentCapture {
            payment_intent_id: created.payment_intent_id,
            order_uuid: created.order.uuid,
        };

        ctx.orders.capture_payment(capture.clone()).await?;

        let result = ctx.orders.capture_payment(capture).await;

        assert!(
            matches!(result, Err(OrdersServiceError::AlreadyCaptured)),
            "expected AlreadyCaptured, got {result:?}"
        );
        assert_eq!(ctx.products.get_product(product).await?.total_stock, 8);

        Ok(())
    }

    #[tokio::test]
    async fn declined_payment_leaves_order_pending() -> TestResult {
        let ctx = TestContext::with_failure_mode(PaymentFailureMode::Decline).await;
        let user = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let cart = seed_cart(&ctx, user, &[(product, 2)]).await?;

        let created = ctx
            .orders
            .create_order(new_order(user, cart, &[(product, 2)], dollars(100)))
            .await?;

        let result = ctx
            .orders
            .capture_payment(PaymentCapture {
                payment_intent_id: created.payment_intent_id,
                order_uuid: created.order.uuid,
            })
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::PaymentFailed)),
            "expected PaymentFailed, got {result:?}"
        );

        let order = ctx.orders.get_order(created.order.uuid).await?;

        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(ctx.products.get_product(product).await?.total_stock, 10);
        assert_eq!(ctx.carts.get_cart(cart).await?.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn list_user_orders_returns_only_that_users_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let user = UserUuid::new();
        let other = UserUuid::new();
        let product = ProductUuid::new();

        ctx.products
            .create_product(new_product(product, 50_00, 10))
            .await?;

        let first = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 1)], dollars(50)))
            .await?;
        let second = ctx
            .orders
            .create_order(new_order(user, CartUuid::new(), &[(product, 2)], dollars(100)))
            .await?;
        ctx.orders
            .create_order(new_order(other, CartUuid::new(), &[(product, 1)], dollars(50)))
            .await?;

        let orders = ctx.orders.list_user_orders(user).await?;
        let mut uuids: Vec<OrderUuid> = orders.iter().map(|o| o.uuid).collect();
        uuids.sort_unstable();

        let mut expected = vec![first.order.uuid, second.order.uuid];
        expected.sort_unstable();

        assert_eq!(uuids, expected);
        assert!(orders.iter().all(|o| o.items.len() == 1));

        Ok(())
    }

    #[tokio::test]
    async fn get_order_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.orders.get_order(OrderUuid::new()).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
