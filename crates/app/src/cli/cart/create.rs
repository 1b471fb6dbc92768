use clap::Args;
use storefront_app::domain::{
    carts::{
        CartsService, PgCartsService,
        models::{CartUuid, NewCart},
    },
    users::UserUuid,
};
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct CreateCartArgs {
    /// Owning user
    #[arg(long)]
    user_uuid: Option<Uuid>,

    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Optional cart UUID; generated when omitted
    #[arg(long)]
    cart_uuid: Option<Uuid>,
}

pub(crate) async fn run(args: CreateCartArgs) -> Result<(), String> {
    let service = PgCartsService::new(crate::cli::connect(&args.database_url).await?);

    let cart = service
        .create_cart(NewCart {
            uuid: args.cart_uuid.map_or_else(CartUuid::new, CartUuid::from_uuid),
            user_uuid: args.user_uuid.map(UserUuid::from_uuid),
        })
        .await
        .map_err(|error| format!("failed to create cart: {error}"))?;

    println!("cart_uuid: {}", cart.uuid);

    if let Some(user) = cart.user_uuid {
        println!("user_uuid: {user}");
    }

    Ok(())
}
