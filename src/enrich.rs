//! Joins the current listing set with history snapshots and meta series.
//!
//! Growth fields and the trailing download series are assigned, never
//! accumulated, so enriching the same listings twice yields equal results.

use std::collections::HashMap;

use crate::growth::compute_growth;
use crate::model::{Extension, History, MetaEntry};

/// Attaches day-over-day growth, week-over-week growth and the trailing
/// download series to each listing.
///
/// The "last day" window compares yesterday against two days ago and the
/// "last week" window compares two days ago against seven days ago; the
/// archive holds no snapshot for the current day. Listings without a
/// matching history or meta entry keep the corresponding field `None`.
pub fn enrich(
    extensions: Vec<Extension>,
    history: &History,
    meta: Option<&[MetaEntry]>,
) -> Vec<Extension> {
    let meta_index: HashMap<&str, &MetaEntry> = meta
        .unwrap_or_default()
        .iter()
        .map(|entry| (entry.name.as_str(), entry))
        .collect();

    extensions
        .into_iter()
        .map(|mut extension| {
            extension.growth_last_day =
                compute_growth(&extension.name, &history.day1, &history.day2);
            extension.growth_last_week =
                compute_growth(&extension.name, &history.day2, &history.day7);
            extension.previous_days_downloads = meta_index
                .get(extension.name.as_str())
                .filter(|entry| !entry.previous_days_downloads.is_empty())
                .map(|entry| {
                    let mut series = entry.previous_days_downloads.clone();
                    series.push(extension.download_count);
                    series
                });
            extension
        })
        .collect()
}
