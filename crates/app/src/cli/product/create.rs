use clap::Args;
use storefront_app::domain::products::{
    PgProductsService, ProductsService,
    models::{NewProduct, ProductUuid},
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateProductArgs {
    /// Product title
    #[arg(long)]
    title: String,

    /// Optional image URL
    #[arg(long)]
    image: Option<String>,

    /// Base price in minor currency units
    #[arg(long)]
    price: u64,

    /// Sale price in minor currency units; 0 means not on sale
    #[arg(long, default_value_t = 0)]
    sale_price: u64,

    /// Units in stock
    #[arg(long, default_value_t = 0)]
    stock: u64,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional product UUID; generated when omitted
    #[arg(long)]
    product_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateProductArgs) -> Result<(), String> {
    let service = PgProductsService::new(crate::cli::connect(&args.database_url).await?);

    let product = service
        .create_product(NewProduct {
            uuid: args
                .product_uuid
                .map_or_else(ProductUuid::new, ProductUuid::from_uuid),
            title: args.title,
            image: args.image,
            price: args.price,
            sale_price: args.sale_price,
            total_stock: args.stock,
        })
        .await
        .map_err(|error| format!("failed to create product: {error}"))?;

    println!("product_uuid: {}", product.uuid);
    println!("title: {}", product.title);
    println!("price: {}", *product.effective_price());
    println!("total_stock: {}", product.total_stock);

    Ok(())
}
