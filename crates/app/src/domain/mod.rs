//! Product tracking domain concerns

pub mod coupons;
pub mod imports;
pub mod products;
