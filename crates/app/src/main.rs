//! Product tracking command line

use std::process;

use clap::Parser;
use prodtrack_app::observability;

use crate::cli::Cli;

mod cli;

#[tokio::main]
pub async fn main() {
    // .env is optional
    let _env = dotenvy::dotenv();

    let cli = Cli::parse();

    if let Err(error) = observability::init(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
