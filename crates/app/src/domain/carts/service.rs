//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItem, CartUuid, NewCart},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        products::models::ProductUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, uuid: CartUuid) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let mut cart = self
            .carts_repository
            .get_cart(&mut tx, uuid)
            .await?
            .ok_or(CartsServiceError::NotFound)?;

        let items = self.items_repository.get_cart_items(&mut tx, uuid).await?;

        tx.commit().await?;

        cart.items.extend(items);

        Ok(cart)
    }

    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.carts_repository.create_cart(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn set_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if self.carts_repository.touch_cart(&mut tx, cart).await? == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let item = self
            .items_repository
            .set_cart_item(&mut tx, cart, product, quantity)
            .await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn clear_cart(&self, cart: CartUuid) -> Result<u64, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        if self.carts_repository.touch_cart(&mut tx, cart).await? == 0 {
            return Err(CartsServiceError::NotFound);
        }

        let removed = self.items_repository.clear_cart_items(&mut tx, cart).await?;

        tx.commit().await?;

        Ok(removed)
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Retrieve a single cart with its items.
    async fn get_cart(&self, uuid: CartUuid) -> Result<Cart, CartsServiceError>;

    /// Creates a new, empty cart.
    async fn create_cart(&self, cart: NewCart) -> Result<Cart, CartsServiceError>;

    /// Set the quantity of a product in the cart, adding the product if absent.
    async fn set_item(
        &self,
        cart: CartUuid,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<CartItem, CartsServiceError>;

    /// Remove every item from the cart, returning how many were removed.
    async fn clear_cart(&self, cart: CartUuid) -> Result<u64, CartsServiceError>;
}
