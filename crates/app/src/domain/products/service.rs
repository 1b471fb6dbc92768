//! Products service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::products::{
        errors::ProductsServiceError,
        models::{NewProduct, Product, ProductUuid},
        repository::PgProductsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgProductsService {
    db: Db,
    repository: PgProductsRepository,
}

impl PgProductsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgProductsRepository::new(),
        }
    }
}

#[async_trait]
impl ProductsService for PgProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let products = self.repository.list_products(&mut tx).await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let product = self
            .repository
            .get_product(&mut tx, product)
            .await?
            .ok_or(ProductsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let mut tx = self.db.begin().await?;

        let created = self.repository.create_product(&mut tx, product).await?;

        tx.commit().await?;

        tracing::info!(product_uuid = %created.uuid, "created product");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products that have not been deleted.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Creates a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_product};

    use super::*;

    #[tokio::test]
    async fn create_product_returns_created_product() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        let product = ctx
            .products
            .create_product(NewProduct {
                uuid,
                title: "Canvas Tote".to_string(),
                image: Some("tote.jpg".to_string()),
                price: 25_00,
                sale_price: 19_99,
                total_stock: 12,
            })
            .await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.title, "Canvas Tote");
        assert_eq!(product.image.as_deref(), Some("tote.jpg"));
        assert_eq!(product.price, 25_00);
        assert_eq!(product.sale_price, 19_99);
        assert_eq!(product.total_stock, 12);
        assert_eq!(*product.effective_price(), 19_99);
        assert!(product.deleted_at.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn get_product_returns_created_product() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid, 15_00, 3))
            .await?;

        let product = ctx.products.get_product(uuid).await?;

        assert_eq!(product.uuid, uuid);
        assert_eq!(product.price, 15_00);
        assert_eq!(product.total_stock, 3);

        Ok(())
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.products.get_product(ProductUuid::new()).await;

        assert!(
            matches!(result, Err(ProductsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_products_returns_created_products() -> TestResult {
        let ctx = TestContext::new().await;

        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid_a, 1_00, 1))
            .await?;

        ctx.products
            .create_product(new_product(uuid_b, 2_00, 1))
            .await?;

        let products = ctx.products.list_products().await?;

        let uuids: Vec<ProductUuid> = products.iter().map(|p| p.uuid).collect();

        assert!(uuids.contains(&uuid_a), "product A should be in the list");
        assert!(uuids.contains(&uuid_b), "product B should be in the list");

        Ok(())
    }

    #[tokio::test]
    async fn create_product_duplicate_uuid_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let uuid = ProductUuid::new();

        ctx.products
            .create_product(new_product(uuid, 1_00, 1))
            .await?;

        let result = ctx.products.create_product(new_product(uuid, 2_00, 1)).await;

        assert!(
            matches!(result, Err(ProductsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_product_with_empty_title_returns_invalid_data() {
        let ctx = TestContext::new().await;

        let mut product = new_product(ProductUuid::new(), 1_00, 1);
        product.title = String::new();

        let result = ctx.products.create_product(product).await;

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }
}
