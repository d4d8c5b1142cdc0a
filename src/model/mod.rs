//! Core data types for store listings and history snapshots.
//!
//! This module contains the fundamental types used throughout raystat:
//!
//! - [`Extension`] - One marketplace listing
//! - [`User`] - An author or contributor profile, embedded in listings
//! - [`DaySnapshot`] - One day's historical download counts, indexed by name
//! - [`MetaEntry`] - Trailing per-day download counts for one extension
//!
//! # Example
//!
//! ```
//! use raystat::model::{DaySnapshot, HistoryRecord};
//!
//! let snapshot = DaySnapshot::new(vec![HistoryRecord {
//!     name: "pomodoro".to_string(),
//!     created_at: 1636012800,
//!     updated_at: 1678838400,
//!     download_count: 4210,
//! }]);
//!
//! assert!(snapshot.get("pomodoro").is_some());
//! ```

mod extension;
mod history;

pub use extension::*;
pub use history::*;
