//! iap-sweep - Worldwide App Store in-app-purchase price sweep CLI
//!
//! Sweeps every App Store storefront for one in-app purchase, converts the
//! localized prices into a home currency, and writes a ranked report.

pub mod appstore;
pub mod config;
pub mod matching;
pub mod normalize;
pub mod prompt;
pub mod rates;
pub mod report;
pub mod sweep;

pub use appstore::{AppSnapshot, PriceRecord, PurchaseOffer, Region};
pub use config::Config;
pub use matching::MatchTarget;
