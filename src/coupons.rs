//! Coupon codes

use std::{fmt, ops::RangeInclusive, str::FromStr};

use rand::Rng;
use thiserror::Error;

/// Prefix every coupon code starts with.
pub const COUPON_PREFIX: &str = "COUPON-";

/// Range the numeric part of a coupon code is drawn from.
pub const COUPON_NUMBERS: RangeInclusive<u32> = 100_000..=999_999;

/// Coupon code parse errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid coupon code `{0}` (expected COUPON-NNNNNN)")]
pub struct CouponCodeError(pub String);

/// A redemption code of the form `COUPON-NNNNNN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CouponCode(u32);

impl CouponCode {
    /// Draw a fresh code uniformly from [`COUPON_NUMBERS`].
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(COUPON_NUMBERS))
    }

    /// Numeric part of the code.
    pub const fn number(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for CouponCode {
    type Error = CouponCodeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        if COUPON_NUMBERS.contains(&value) {
            Ok(Self(value))
        } else {
            Err(CouponCodeError(value.to_string()))
        }
    }
}

impl FromStr for CouponCode {
    type Err = CouponCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CouponCodeError(s.to_string());

        let digits = s.strip_prefix(COUPON_PREFIX).ok_or_else(invalid)?;

        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let number = digits.parse::<u32>().map_err(|_error| invalid())?;

        Self::try_from(number).map_err(|_error| invalid())
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{COUPON_PREFIX}{}", self.0)
    }
}
