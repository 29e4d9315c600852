//! App Store storefront module: regions, HTTP client, payload extraction, and models.

pub mod client;
pub mod extract;
pub mod models;
pub mod regions;

pub use client::{StorefrontClient, StorefrontFetch};
pub use models::{AppSnapshot, PriceRecord, PurchaseOffer};
pub use regions::Region;
