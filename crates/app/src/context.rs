//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, Db},
    domain::{
        coupons::{CouponsService, SqliteCouponsService},
        products::{ProductsService, SqliteProductsService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open database")]
    Database(#[source] sqlx::Error),

    #[error("failed to initialise database schema")]
    Migrate(#[from] MigrateError),
}

/// Open store plus the services running against it.
#[derive(Clone)]
pub struct AppContext {
    pub db: Db,
    pub products: Arc<dyn ProductsService>,
    pub coupons: Arc<dyn CouponsService>,
}

impl AppContext {
    /// Open the store at `url`, creating it and its tables when missing.
    ///
    /// # Errors
    ///
    /// Returns an error when the database cannot be opened or its schema
    /// cannot be applied.
    pub async fn from_database_url(url: &str) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::init_schema(&pool).await?;

        info!(database_url = url, "store opened");

        let db = Db::new(pool);

        Ok(Self {
            products: Arc::new(SqliteProductsService::new(db.clone())),
            coupons: Arc::new(SqliteCouponsService::new(db.clone())),
            db,
        })
    }

    /// Release the store.
    pub async fn close(self) {
        self.db.close().await;
    }
}
