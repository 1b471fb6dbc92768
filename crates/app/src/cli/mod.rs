use clap::{Parser, Subcommand};
use storefront_app::database::{self, Db};

mod cart;
mod db;
mod product;

#[derive(Debug, Parser)]
#[command(name = "storefront-app", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Product(product::ProductCommand),
    Cart(cart::CartCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Product(command) => product::run(command).await,
            Commands::Cart(command) => cart::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

/// Open a connection pool or explain why not.
async fn connect(database_url: &str) -> Result<Db, String> {
    let pool = database::connect(database_url)
        .await
        .map_err(|error| format!("failed to connect to database: {error}"))?;

    Ok(Db::new(pool))
}
