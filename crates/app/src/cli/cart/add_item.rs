use clap::Args;
use storefront_app::domain::{
    carts::{CartsService, PgCartsService, models::CartUuid},
    products::models::ProductUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct AddItemArgs {
    #[arg(long)]
    cart_uuid: Uuid,

    #[arg(long)]
    product_uuid: Uuid,

    /// Quantity to hold in the cart; replaces any existing quantity
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    quantity: u32,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(args: AddItemArgs) -> Result<(), String> {
    let service = PgCartsService::new(crate::cli::connect(&args.database_url).await?);

    let item = service
        .set_item(
            CartUuid::from_uuid(args.cart_uuid),
            ProductUuid::from_uuid(args.product_uuid),
            args.quantity,
        )
        .await
        .map_err(|error| format!("failed to add item to cart: {error}"))?;

    println!("product_uuid: {}", item.product_uuid);
    println!("quantity: {}", item.quantity);

    Ok(())
}
