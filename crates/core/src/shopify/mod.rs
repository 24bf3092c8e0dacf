//! Shopify Admin API abstraction.
//!
//! The `OrdersApi` trait covers the four calls the cancellation flow
//! needs; `ShopifyClient` is the reqwest-backed implementation.

mod client;
mod types;

pub use client::ShopifyClient;
pub use types::*;
