//! Prodtrack prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    coupons::{CouponCode, CouponCodeError},
    payload::{PAYLOAD_PREFIX, PayloadError, ProductPayload},
    products::{LabelError, ProductLabel, ProductStatus},
    scan::{CancelToken, FrameSource, ScanError, ScanLimits, ScanOutcome, scan},
    visual::VisualCodeError,
};
