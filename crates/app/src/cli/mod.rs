use clap::{Parser, Subcommand};
use prodtrack_app::{config::AppConfig, context::AppContext};

mod import;
mod output;
mod product;
mod redeem;
mod scan;
mod source;

#[derive(Debug, Parser)]
#[command(name = "prodtrack", about = "Product authenticity tracking", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Add and list products
    Product(product::ProductCommand),

    /// Check a product's authenticity from its visual code
    Scan(scan::ScanArgs),

    /// Bulk upload products from a CSV file
    Import(import::ImportArgs),

    /// Redeem a visual code for a coupon
    Redeem(redeem::RedeemArgs),
}

impl Cli {
    /// Open the store, run the command, and close the store whatever the
    /// command's outcome.
    pub(crate) async fn run(self) -> Result<(), String> {
        let ctx = AppContext::from_database_url(&self.config.database.database_url)
            .await
            .map_err(|error| format!("failed to open product store: {error}"))?;

        let result = match self.command {
            Commands::Product(command) => product::run(&ctx, command).await,
            Commands::Scan(args) => scan::run(&ctx, args).await,
            Commands::Import(args) => import::run(&ctx, args).await,
            Commands::Redeem(args) => redeem::run(&ctx, args).await,
        };

        ctx.close().await;

        result
    }
}
