//! Prodtrack
//!
//! Product authenticity tracking: product labels, the payload carried by a
//! product's visual code, the visual code codec itself, live scanning and
//! coupon codes. Persistence lives in the `prodtrack-app` crate.

pub mod coupons;
pub mod payload;
pub mod prelude;
pub mod products;
pub mod scan;
pub mod visual;
