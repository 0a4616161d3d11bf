//! Products Repository

use jiff::civil::Date;
use prodtrack::products::ProductStatus;
use sqlx::{FromRow, Row, Sqlite, Transaction, query_as, sqlite::SqliteRow};

use crate::domain::products::{
    data::NewProduct,
    records::{ProductId, ProductRecord},
};

const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const CREATE_PRODUCT_SQL: &str = include_str!("sql/create_product.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteProductsRepository;

impl SqliteProductsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_products(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
    ) -> Result<Vec<ProductRecord>, sqlx::Error> {
        query_as::<Sqlite, ProductRecord>(LIST_PRODUCTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_product(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: ProductId,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Sqlite, ProductRecord>(GET_PRODUCT_SQL)
            .bind(product.into_i64())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_product(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        product: &NewProduct,
    ) -> Result<ProductRecord, sqlx::Error> {
        query_as::<Sqlite, ProductRecord>(CREATE_PRODUCT_SQL)
            .bind(&product.name)
            .bind(&product.barcode)
            .bind(product.expiry_date.to_string())
            .bind(product.status.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, SqliteRow> for ProductRecord {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let expiry_date = row
            .try_get::<String, _>("expiry_date")?
            .parse::<Date>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "expiry_date".to_string(),
                source: Box::new(e),
            })?;

        let status = row
            .try_get::<String, _>("status")?
            .parse::<ProductStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: ProductId::from_i64(row.try_get("id")?),
            name: row.try_get("product_name")?,
            barcode: row.try_get("barcode")?,
            expiry_date,
            status,
        })
    }
}
