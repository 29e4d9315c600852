//! Home-currency conversion and ranking of sweep results.

use crate::appstore::PriceRecord;
use crate::rates::RateTable;
use std::cmp::Ordering;
use tracing::debug;

/// Converts each record into the home currency and sorts ascending.
///
/// The rate table is relative to the home currency, so the raw foreign price
/// divided by its rate yields the home-currency amount. Records whose
/// currency has no rate stay unconverted and sort after all converted ones;
/// the sort is stable, so re-running with the same table is idempotent.
pub fn normalize(records: &mut [PriceRecord], rates: &RateTable) {
    for record in records.iter_mut() {
        record.home_price = rates.get(&record.currency).map(|rate| round2(record.price / rate));
    }

    records.sort_by(|a, b| match (a.home_price, b.home_price) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });

    debug!(
        "Normalized {} records ({} unconvertible)",
        records.len(),
        records.iter().filter(|r| r.home_price.is_none()).count()
    );
}

/// Half-up rounding to 2 decimal places.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
