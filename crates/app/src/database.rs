//! Database connection management

use std::{str::FromStr, time::Duration};

use sqlx::{
    Sqlite, SqlitePool, Transaction,
    migrate::{MigrateError, Migrator},
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

/// Embedded schema migrations. Every statement is `IF NOT EXISTS`, so running
/// them against a database created by an older build is harmless.
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Default store location, relative to the working directory.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://scanprods.db";

const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// Record store handle, passed explicitly to every service.
#[derive(Debug, Clone)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when no connection can be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.pool.begin().await
    }

    /// Close every connection, waiting for in-flight work to finish.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

/// Open the `SQLite` database at `database_url`, creating the file when missing.
///
/// The pool holds a single connection: the store assumes one interactive user.
///
/// # Errors
///
/// Returns an error if the URL is invalid or the database cannot be opened.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .busy_timeout(BUSY_TIMEOUT);

    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}

/// Create the products and coupons tables if absent.
///
/// # Errors
///
/// Returns an error if a migration fails to apply.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}
