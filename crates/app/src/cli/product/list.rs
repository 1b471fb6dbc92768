use clap::Args;
use storefront_app::domain::products::{PgProductsService, ProductsService};

#[derive(Debug, Args)]
pub(crate) struct ListProductsArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: ListProductsArgs) -> Result<(), String> {
    let service = PgProductsService::new(crate::cli::connect(&args.database_url).await?);

    let products = service
        .list_products()
        .await
        .map_err(|error| format!("failed to list products: {error}"))?;

    for product in products {
        println!(
            "{}\t{}\t{}\t{}",
            product.uuid,
            *product.effective_price(),
            product.total_stock,
            product.title
        );
    }

    Ok(())
}
