//! Structured extraction of the embedded shoebox payload from product pages.
//!
//! The App Store renders in-app purchase data as JSON-in-JSON inside one
//! inline script block. Any structural mismatch, at either decode level,
//! collapses to absence: an unlisted or malformed page is a normal outcome,
//! never an error that aborts a sweep.

use super::models::{AppSnapshot, PurchaseOffer};
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::LazyLock;
use tracing::{debug, trace};

/// The shoebox cache block carrying app and purchase data.
static SHOEBOX: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script#shoebox-media-api-cache-apps").unwrap());

#[derive(Deserialize)]
struct ShoeboxPayload {
    d: Vec<MediaItem>,
}

#[derive(Deserialize)]
struct MediaItem {
    relationships: Option<Relationships>,
}

#[derive(Deserialize)]
struct Relationships {
    #[serde(rename = "top-in-apps")]
    top_in_apps: Option<PurchaseList>,
}

#[derive(Deserialize)]
struct PurchaseList {
    data: Vec<PurchaseEntry>,
}

#[derive(Deserialize)]
struct PurchaseEntry {
    attributes: PurchaseAttributes,
}

#[derive(Deserialize)]
struct PurchaseAttributes {
    name: String,
    #[serde(rename = "offerName")]
    offer_name: String,
    #[serde(default)]
    offers: Vec<OfferPricing>,
}

#[derive(Deserialize)]
struct OfferPricing {
    price: f64,
    #[serde(rename = "currencyCode")]
    currency_code: String,
    #[serde(rename = "priceFormatted")]
    price_formatted: String,
}

/// Extracts the purchase snapshot from a raw product page.
///
/// Returns `None` when the page carries no shoebox block, either JSON level
/// fails to decode, or the purchase-relationships collection is missing.
pub fn extract_snapshot(html: &str) -> Option<AppSnapshot> {
    let document = Html::parse_document(html);

    let raw = document
        .select(&SHOEBOX)
        .next()
        .map(|e| e.text().collect::<String>())?;

    // Outer level: an object whose single value is a second JSON-encoded string.
    let outer: serde_json::Map<String, serde_json::Value> =
        serde_json::from_str(raw.trim()).ok()?;
    let inner_raw = outer.values().next()?.as_str()?;

    let payload: ShoeboxPayload = serde_json::from_str(inner_raw).ok()?;

    let purchases = payload
        .d
        .first()?
        .relationships
        .as_ref()?
        .top_in_apps
        .as_ref()?
        .data
        .iter()
        .filter_map(flatten_entry)
        .collect::<Vec<_>>();

    debug!("Extracted {} purchases from shoebox payload", purchases.len());

    Some(AppSnapshot { purchases })
}

/// Flattens one purchase entry into a domain offer.
///
/// Entries without a pricing block are skipped rather than collapsing the
/// whole region to absence.
fn flatten_entry(entry: &PurchaseEntry) -> Option<PurchaseOffer> {
    let pricing = match entry.attributes.offers.first() {
        Some(p) => p,
        None => {
            trace!("Skipping purchase '{}' with no offers", entry.attributes.name);
            return None;
        }
    };

    Some(PurchaseOffer {
        offer_name: entry.attributes.offer_name.clone(),
        display_name: entry.attributes.name.clone(),
        price: pricing.price,
        currency: pricing.currency_code.clone(),
        formatted_price: pricing.price_formatted.clone(),
    })
}
