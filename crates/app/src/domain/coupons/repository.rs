//! Coupons Repository

use prodtrack::coupons::CouponCode;
use sqlx::{FromRow, Row, Sqlite, Transaction, query_as, sqlite::SqliteRow};

use crate::domain::coupons::records::{CouponId, CouponRecord};

const GET_COUPON_SQL: &str = include_str!("sql/get_coupon.sql");
const CREATE_COUPON_SQL: &str = include_str!("sql/create_coupon.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct SqliteCouponsRepository;

impl SqliteCouponsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_coupon(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        payload: &str,
    ) -> Result<Option<CouponRecord>, sqlx::Error> {
        query_as::<Sqlite, CouponRecord>(GET_COUPON_SQL)
            .bind(payload)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_coupon(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        payload: &str,
        code: CouponCode,
    ) -> Result<CouponRecord, sqlx::Error> {
        query_as::<Sqlite, CouponRecord>(CREATE_COUPON_SQL)
            .bind(payload)
            .bind(code.to_string())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, SqliteRow> for CouponRecord {
    fn from_row(row: &'r SqliteRow) -> sqlx::Result<Self> {
        let code = row
            .try_get::<String, _>("coupon_code")?
            .parse::<CouponCode>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "coupon_code".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: CouponId::from_i64(row.try_get("id")?),
            payload: row.try_get("qr_data")?,
            code,
        })
    }
}
