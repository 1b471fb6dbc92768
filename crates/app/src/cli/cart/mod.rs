use clap::{Args, Subcommand};

mod add_item;
mod create;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    Create(create::CreateCartArgs),
    AddItem(add_item::AddItemArgs),
}

pub(crate) async fn run(command: CartCommand) -> Result<(), String> {
    match command.command {
        CartSubcommand::Create(args) => create::run(args).await,
        CartSubcommand::AddItem(args) => add_item::run(args).await,
    }
}
