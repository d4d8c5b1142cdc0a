mod history;
mod store;

pub use history::{history_dates, history_path, HistoryClient};
pub use store::StoreClient;

use crate::model::{Extension, History, MetaEntry};
use async_trait::async_trait;

/// Errors from the store and history endpoints.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),
}

/// Source of current marketplace listings.
#[async_trait]
pub trait ListingSource: Send + Sync {
    async fn fetch_listings(&self) -> Result<Vec<Extension>, ApiError>;
}

/// Source of historical download counts and per-day series.
///
/// History is best-effort: days that cannot be fetched come back as
/// empty snapshots, and meta info is `None` when unavailable.
#[async_trait]
pub trait HistorySource: Send + Sync {
    async fn fetch_history(&self) -> History;
    async fn fetch_meta_info(&self) -> Option<Vec<MetaEntry>>;
}

pub fn default_listing_source() -> StoreClient {
    StoreClient::new()
}

pub fn default_history_source() -> HistoryClient {
    HistoryClient::new()
}
