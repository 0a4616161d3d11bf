use clap::{Args, Subcommand};
use prodtrack_app::context::AppContext;

mod add;
mod list;

#[derive(Debug, Args)]
pub(crate) struct ProductCommand {
    #[command(subcommand)]
    command: ProductSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductSubcommand {
    /// Add a product and write its visual code
    Add(add::AddProductArgs),

    /// List stored products
    List(list::ListProductsArgs),
}

pub(crate) async fn run(ctx: &AppContext, command: ProductCommand) -> Result<(), String> {
    match command.command {
        ProductSubcommand::Add(args) => add::run(ctx, args).await,
        ProductSubcommand::List(args) => list::run(ctx, args).await,
    }
}
