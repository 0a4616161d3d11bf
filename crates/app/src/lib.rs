//! Product tracking persistence, services and command line support.

#[cfg(feature = "camera")]
pub mod camera;
pub mod config;
pub mod context;
pub mod database;
pub mod domain;
pub mod ids;
pub mod observability;
pub mod shutdown;

#[cfg(test)]
mod test;
