//! Coupons service.

use async_trait::async_trait;
use mockall::automock;
use prodtrack::{coupons::CouponCode, payload};
use tracing::{debug, info};

use crate::{
    database::Db,
    domain::coupons::{
        errors::CouponsServiceError,
        records::{CouponRecord, Redemption},
        repository::SqliteCouponsRepository,
    },
};

/// Source of fresh coupon codes.
pub type CodeGenerator = fn() -> CouponCode;

fn random_code() -> CouponCode {
    CouponCode::generate(&mut rand::thread_rng())
}

#[derive(Debug, Clone)]
pub struct SqliteCouponsService {
    db: Db,
    repository: SqliteCouponsRepository,
    generate: CodeGenerator,
}

impl SqliteCouponsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self::with_generator(db, random_code)
    }

    /// Service drawing codes from `generate` instead of the thread RNG.
    #[must_use]
    pub fn with_generator(db: Db, generate: CodeGenerator) -> Self {
        Self {
            db,
            repository: SqliteCouponsRepository::new(),
            generate,
        }
    }
}

#[async_trait]
impl CouponsService for SqliteCouponsService {
    async fn get_coupon(&self, payload: &str) -> Result<CouponRecord, CouponsServiceError> {
        let mut tx = self.db.begin().await?;

        let coupon = self
            .repository
            .get_coupon(&mut tx, payload)
            .await?
            .ok_or(CouponsServiceError::NotFound)?;

        tx.commit().await?;

        Ok(coupon)
    }

    async fn redeem(&self, payload: &str) -> Result<Redemption, CouponsServiceError> {
        if !payload::is_recognized(payload) {
            return Err(CouponsServiceError::Unrecognized);
        }

        let mut tx = self.db.begin().await?;

        if let Some(coupon) = self.repository.get_coupon(&mut tx, payload).await? {
            tx.commit().await?;

            debug!(coupon_id = %coupon.id, "payload already redeemed");

            return Ok(Redemption {
                coupon,
                newly_issued: false,
            });
        }

        let code = (self.generate)();

        let result = self
            .repository
            .create_coupon(&mut tx, payload, code)
            .await
            .map_err(CouponsServiceError::from);

        match result {
            Ok(coupon) => {
                tx.commit().await?;

                info!(coupon_id = %coupon.id, code = %coupon.code, "coupon issued");

                Ok(Redemption {
                    coupon,
                    newly_issued: true,
                })
            }
            Err(CouponsServiceError::AlreadyExists) => {
                // another writer issued a coupon between our read and insert
                tx.rollback().await?;

                Ok(Redemption {
                    coupon: self.get_coupon(payload).await?,
                    newly_issued: false,
                })
            }
            Err(error) => Err(error),
        }
    }
}

#[automock]
#[async_trait]
pub trait CouponsService: Send + Sync {
    /// Retrieve the coupon issued for `payload`, without issuing one.
    async fn get_coupon(&self, payload: &str) -> Result<CouponRecord, CouponsServiceError>;

    /// Return the coupon for `payload`, issuing one on first redemption.
    async fn redeem(&self, payload: &str) -> Result<Redemption, CouponsServiceError>;
}
