//! Storefront
//!
//! Pricing, stock and order-state rules for the storefront order flow. Everything in this crate
//! is synchronous and free of I/O; persistence and HTTP live in the `storefront-app` and
//! `storefront-json` crates.

pub mod orders;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod stock;
