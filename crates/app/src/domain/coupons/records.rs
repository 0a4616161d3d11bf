//! Coupon Records

use prodtrack::coupons::CouponCode;

use crate::ids::TypedId;

/// Coupon Id
pub type CouponId = TypedId<CouponRecord>;

/// Coupon Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponRecord {
    /// Store-assigned identity.
    pub id: CouponId,

    /// Exact decoded text of the visual code the coupon was issued for.
    pub payload: String,

    /// Redemption code.
    pub code: CouponCode,
}

/// Result of a redemption attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redemption {
    /// The coupon tied to the scanned payload.
    pub coupon: CouponRecord,

    /// `false` when the payload had already been redeemed.
    pub newly_issued: bool,
}
