//! Region sweep orchestration.
//!
//! A sweep is one full pass over all non-home storefronts, in catalog order
//! and strictly sequential, accumulating one price record per matching offer.
//! The exact-to-keyword fallback is an explicit two-attempt state machine;
//! each attempt owns a fresh accumulation vector, so exact-mode results
//! never leak into a keyword retry.

use crate::appstore::{PriceRecord, Region, StorefrontFetch};
use crate::matching::{match_region, MatchTarget};
use anyhow::Result;
use dialoguer::console::style;
use std::fmt;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Which matching mode the current sweep attempt runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepMode {
    /// First attempt: match the interactively selected offer exactly.
    Exact,
    /// Fallback attempt: match operator-supplied keywords.
    Keyword,
}

impl fmt::Display for SweepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepMode::Exact => write!(f, "exact"),
            SweepMode::Keyword => write!(f, "keyword"),
        }
    }
}

/// Runs one sweep attempt over every region except the home region.
///
/// Per-region failures are swallowed here: a fetch error or missing payload
/// is narrated as "not offered" and the loop continues. Only the zero-record
/// outcome escalates, and that decision belongs to the caller.
pub async fn sweep_regions(
    client: &impl StorefrontFetch,
    app_id: &str,
    home: &Region,
    target: &MatchTarget,
) -> Vec<PriceRecord> {
    let mut records: Vec<PriceRecord> = Vec::new();

    for region in Region::all() {
        if region.code == home.code {
            debug!("Skipping home region {}", region.code);
            continue;
        }

        let snapshot = match client.product_snapshot(app_id, region).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => {
                report_not_offered(region);
                continue;
            }
            Err(e) => {
                warn!("Fetch failed for {}: {:#}", region.code, e);
                report_not_offered(region);
                continue;
            }
        };

        let matches = match_region(&snapshot, target);
        if matches.is_empty() {
            report_not_offered(region);
            continue;
        }

        for offer in matches {
            println!(
                "{} → {}",
                region.name,
                style(format!("{} ({})", offer.formatted_price, offer.currency)).green()
            );
            records.push(PriceRecord::new(region.name, offer));
        }
    }

    info!("Sweep produced {} records", records.len());
    records
}

fn report_not_offered(region: &Region) {
    println!("{} → {}", region.name, style("not offered").red());
}

/// Terminal state of the two-attempt sweep.
#[derive(Debug, PartialEq)]
pub enum SweepOutcome {
    /// At least one region matched; carries the mode that produced the records.
    Matched { mode: SweepMode, records: Vec<PriceRecord> },
    /// The exact sweep found nothing and the operator declined keyword fallback.
    FallbackDeclined,
    /// The keyword fallback also found nothing in any region.
    NoKeywordMatches,
}

/// Drives the exact-then-keyword state machine: at most two attempts, each
/// preceded by the pacing pause.
///
/// `keywords` is the operator collaborator, consulted only when the exact
/// sweep comes back empty; returning `Ok(None)` declines the fallback. Both
/// non-`Matched` outcomes are fatal for the run and nothing has been
/// persisted when they are returned.
pub async fn sweep_with_fallback(
    client: &impl StorefrontFetch,
    app_id: &str,
    home: &Region,
    target: MatchTarget,
    pause_ms: u64,
    keywords: impl FnOnce() -> Result<Option<Vec<String>>>,
) -> Result<SweepOutcome> {
    pace(pause_ms).await;
    let records = sweep_regions(client, app_id, home, &target).await;
    if !records.is_empty() {
        return Ok(SweepOutcome::Matched { mode: SweepMode::Exact, records });
    }

    let Some(keywords) = keywords()? else {
        return Ok(SweepOutcome::FallbackDeclined);
    };

    info!("Falling back to keyword sweep: {:?}", keywords);
    let target = MatchTarget::KeywordSet { keywords };

    pace(pause_ms).await;
    let records = sweep_regions(client, app_id, home, &target).await;
    if records.is_empty() {
        Ok(SweepOutcome::NoKeywordMatches)
    } else {
        Ok(SweepOutcome::Matched { mode: SweepMode::Keyword, records })
    }
}

/// Fixed pacing pause before each sweep attempt.
async fn pace(pause_ms: u64) {
    if pause_ms > 0 {
        tokio::time::sleep(Duration::from_millis(pause_ms)).await;
    }
}
