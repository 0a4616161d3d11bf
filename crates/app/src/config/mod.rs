//! Command line configuration module

use clap::Args;

use crate::config::{db::DatabaseConfig, observability::LoggingConfig};

pub mod db;
pub mod observability;

pub use observability::LogFormat;

/// Settings shared by every command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Record store settings.
    #[command(flatten)]
    pub database: DatabaseConfig,
}
