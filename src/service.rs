//! Fetch, enrich and cache orchestration.
//!
//! [`StoreService`] owns the two data sources and the cache and exposes
//! one read operation: the current enriched listing set. Cache handling
//! follows stale-while-revalidate: a fresh cache entry is served as is,
//! an expired one triggers a refetch, and when the refetch fails the
//! expired entry is served marked stale instead of surfacing the error.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

use crate::api::{self, HistorySource, ListingSource};
use crate::cache::Cache;
use crate::enrich::enrich;
use crate::model::Extension;

/// Cache key for the enriched listing set.
const CACHE_KEY: &str = "extensions";

/// The enriched listing set together with its provenance.
#[derive(Debug, Clone)]
pub struct Listings {
    pub extensions: Vec<Extension>,
    pub fetched_at: DateTime<Utc>,
    /// True when a refresh failed and this data came from an expired
    /// cache entry.
    pub stale: bool,
}

pub struct StoreService {
    listings: Box<dyn ListingSource>,
    history: Box<dyn HistorySource>,
    cache: Cache,
}

impl StoreService {
    pub fn new(cache: Cache) -> Self {
        Self {
            listings: Box::new(api::default_listing_source()),
            history: Box::new(api::default_history_source()),
            cache,
        }
    }

    /// Builds a service over custom data sources.
    pub fn with_sources(
        listings: Box<dyn ListingSource>,
        history: Box<dyn HistorySource>,
        cache: Cache,
    ) -> Self {
        Self {
            listings,
            history,
            cache,
        }
    }

    /// Returns the enriched listing set, from cache when fresh.
    pub async fn extensions(&self) -> Result<Listings> {
        match self.cache.get::<Vec<Extension>>(CACHE_KEY) {
            Some(entry) if entry.fresh => Ok(Listings {
                extensions: entry.value,
                fetched_at: entry.fetched_at,
                stale: false,
            }),
            Some(entry) => match self.revalidate().await {
                Ok(listings) => Ok(listings),
                Err(e) => {
                    tracing::warn!("refresh failed, serving stale data: {:#}", e);
                    Ok(Listings {
                        extensions: entry.value,
                        fetched_at: entry.fetched_at,
                        stale: true,
                    })
                }
            },
            None => self.revalidate().await,
        }
    }

    /// Fetches listings and history, enriches the set and refreshes the
    /// cache.
    ///
    /// Listings come first; history and meta info are then gathered
    /// concurrently. History failures degrade to empty snapshots inside
    /// the source, so only the listing fetch can fail here.
    pub async fn revalidate(&self) -> Result<Listings> {
        let raw = self
            .listings
            .fetch_listings()
            .await
            .context("fetching store listings")?;

        let (history, meta) = tokio::join!(
            self.history.fetch_history(),
            self.history.fetch_meta_info()
        );

        let extensions = enrich(raw, &history, meta.as_deref());

        if let Err(e) = self.cache.set(CACHE_KEY, &extensions) {
            tracing::warn!("failed to write cache: {:#}", e);
        }

        Ok(Listings {
            extensions,
            fetched_at: Utc::now(),
            stale: false,
        })
    }
}
