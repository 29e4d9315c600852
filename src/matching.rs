//! Offer matching: exact offer identity or keyword-set search.

use crate::appstore::{AppSnapshot, PurchaseOffer};

/// What a sweep is looking for in each region's purchase list.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchTarget {
    /// Case-sensitive equality on the storefront-internal offer name.
    ExactOffer { offer_name: String },
    /// Case-insensitive substring match of any keyword against the display name.
    KeywordSet { keywords: Vec<String> },
}

impl MatchTarget {
    /// Builds an exact target from the purchase the operator selected.
    pub fn exact(offer: &PurchaseOffer) -> Self {
        Self::ExactOffer { offer_name: offer.offer_name.clone() }
    }

    /// Returns true if the offer matches this target.
    pub fn matches(&self, offer: &PurchaseOffer) -> bool {
        match self {
            MatchTarget::ExactOffer { offer_name } => offer.offer_name == *offer_name,
            MatchTarget::KeywordSet { keywords } => {
                let name = offer.display_name.to_lowercase();
                keywords.iter().any(|k| name.contains(&k.to_lowercase()))
            }
        }
    }
}

/// Returns every offer in the snapshot that matches the target.
///
/// All matches are collected, not just the first: a single region can fan out
/// into multiple price records. An empty result is a normal outcome.
pub fn match_region<'a>(snapshot: &'a AppSnapshot, target: &MatchTarget) -> Vec<&'a PurchaseOffer> {
    snapshot.purchases.iter().filter(|offer| target.matches(offer)).collect()
}
