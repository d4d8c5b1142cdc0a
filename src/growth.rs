//! Download growth between two daily history snapshots.
//!
//! Growth is stored as a raw ratio (`newer / older`), not a percentage:
//! a ratio of 1.0 means no change. [`Growth::percentage`] converts to the
//! human-readable form.

use serde::{Deserialize, Serialize};

use crate::model::DaySnapshot;

/// Download-count change for one extension over one history window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Growth {
    /// Signed install delta, newer snapshot minus older snapshot.
    pub download_count: i64,
    /// Raw ratio `newer / older`; 1.0 means no change.
    pub download_change_percentage: f64,
}

impl Growth {
    /// True percentage change: `(ratio - 1) * 100`.
    pub fn percentage(&self) -> f64 {
        (self.download_change_percentage - 1.0) * 100.0
    }

    /// Neutral element for aggregation: zero installs, ratio 1.0.
    pub fn neutral() -> Self {
        Self {
            download_count: 0,
            download_change_percentage: 1.0,
        }
    }
}

/// Computes the download growth for `name` between two day snapshots.
///
/// Returns `None` when the name is empty, when either snapshot lacks a
/// record for the name (exact match only), or when the older count is zero:
/// the ratio would not be finite, and formatting and aggregation downstream
/// only handle finite values.
pub fn compute_growth(name: &str, newer: &DaySnapshot, older: &DaySnapshot) -> Option<Growth> {
    if name.is_empty() {
        return None;
    }
    let newer = newer.get(name)?;
    let older = older.get(name)?;
    if older.download_count == 0 {
        return None;
    }
    Some(Growth {
        download_count: newer.download_count as i64 - older.download_count as i64,
        download_change_percentage: newer.download_count as f64 / older.download_count as f64,
    })
}
