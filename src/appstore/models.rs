//! Data models for storefront snapshots, purchase offers, and sweep results.

use serde::{Deserialize, Serialize};

/// One purchasable item's pricing details within a region's snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseOffer {
    /// Storefront-internal offer identifier; identity for exact matching.
    pub offer_name: String,
    /// Customer-facing purchase name; identity for display and keyword matching.
    pub display_name: String,
    /// Raw price in the region's local currency.
    pub price: f64,
    /// 3-letter currency code (USD, EUR, ...).
    pub currency: String,
    /// Locale-formatted price string as rendered by the storefront.
    pub formatted_price: String,
}

impl PurchaseOffer {
    /// Returns the offer as shown in selection lists: "Name: $1.99 (USD)".
    pub fn label(&self) -> String {
        format!("{}: {} ({})", self.display_name, self.formatted_price, self.currency)
    }
}

/// The parsed per-region payload for one application.
///
/// Created per fetch call and discarded after matching; never persisted.
#[derive(Debug, Clone, Default)]
pub struct AppSnapshot {
    /// In-app purchases in storefront order.
    pub purchases: Vec<PurchaseOffer>,
}

impl AppSnapshot {
    /// Returns true if the region lists no in-app purchases.
    pub fn is_empty(&self) -> bool {
        self.purchases.is_empty()
    }
}

/// One successful region match, accumulated during a sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceRecord {
    /// Region display name, drawn from the storefront catalog.
    pub region: String,
    /// Raw price in the region's local currency.
    pub price: f64,
    /// 3-letter currency code.
    pub currency: String,
    /// Price converted to the home currency; None when no rate was available.
    pub home_price: Option<f64>,
}

impl PriceRecord {
    /// Creates a record for a matched offer in the given region.
    pub fn new(region: impl Into<String>, offer: &PurchaseOffer) -> Self {
        Self {
            region: region.into(),
            price: offer.price,
            currency: offer.currency.clone(),
            home_price: None,
        }
    }
}
