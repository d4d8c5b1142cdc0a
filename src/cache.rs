//! File-based caching for API responses.
//!
//! This module provides a simple file-based cache with TTL (time-to-live)
//! support. Each entry records when it was fetched, and expired entries
//! stay readable: callers can fall back to stale data when a refresh
//! fails.
//!
//! # Cache Location
//!
//! The cache is stored in platform-specific directories:
//! - Linux: `~/.cache/raystat/`
//! - macOS: `~/Library/Caches/raystat/`
//! - Windows: `%LOCALAPPDATA%\raystat\cache\`
//!
//! # Example
//!
//! ```no_run
//! use raystat::Cache;
//!
//! let cache = Cache::new();
//!
//! // Store a value
//! cache.set("my_key", &"cached value".to_string()).unwrap();
//!
//! // Retrieve it later, together with its age
//! if let Some(cached) = cache.get::<String>("my_key") {
//!     println!("{} (fresh: {})", cached.value, cached.fresh);
//! }
//! ```

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Default cache TTL in hours.
const CACHE_TTL_HOURS: u64 = 1;

/// On-disk envelope pairing a value with its fetch time.
#[derive(Serialize, Deserialize)]
struct CacheEntry<T> {
    fetched_at: DateTime<Utc>,
    value: T,
}

/// A cached value together with its fetch time and freshness.
pub struct Cached<T> {
    pub value: T,
    pub fetched_at: DateTime<Utc>,
    pub fresh: bool,
}

/// A file-based cache with TTL support.
///
/// Values are stored as JSON files in the cache directory. An entry
/// older than the configured TTL is reported as not fresh rather than
/// dropped.
pub struct Cache {
    dir: PathBuf,
    ttl: Duration,
}

impl Cache {
    /// Creates a new cache with the default 1-hour TTL.
    pub fn new() -> Self {
        Self::with_ttl_hours(CACHE_TTL_HOURS)
    }

    /// Creates a new cache with a custom TTL.
    ///
    /// # Example
    ///
    /// ```
    /// use raystat::Cache;
    ///
    /// // Cache that expires after 12 hours
    /// let cache = Cache::with_ttl_hours(12);
    /// ```
    pub fn with_ttl_hours(hours: u64) -> Self {
        Self {
            dir: cache_dir(),
            ttl: Duration::from_secs(hours * 3600),
        }
    }

    /// Creates a cache rooted at a custom directory.
    pub fn with_dir(dir: PathBuf, ttl: Duration) -> Self {
        Self { dir, ttl }
    }

    /// Ensures the cache directory exists.
    fn ensure_dir(&self) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        Ok(())
    }

    /// Converts a cache key to a safe filename.
    fn cache_path(&self, key: &str) -> PathBuf {
        let safe_key: String = key
            .chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}.json", safe_key))
    }

    /// Retrieves an entry from the cache, fresh or stale.
    ///
    /// Returns `None` only when the key is missing or the stored file
    /// cannot be parsed; entries past the TTL come back with `fresh`
    /// set to false.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<Cached<T>> {
        let path = self.cache_path(key);

        if !path.exists() {
            return None;
        }

        let content = fs::read_to_string(&path).ok()?;
        let entry: CacheEntry<T> = serde_json::from_str(&content).ok()?;

        let age = Utc::now()
            .signed_duration_since(entry.fetched_at)
            .to_std()
            .unwrap_or(Duration::ZERO);

        Some(Cached {
            value: entry.value,
            fetched_at: entry.fetched_at,
            fresh: age <= self.ttl,
        })
    }

    /// Stores a value in the cache, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be created or
    /// the file cannot be written.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.ensure_dir()?;
        let path = self.cache_path(key);
        let entry = CacheEntry {
            fetched_at: Utc::now(),
            value,
        };
        let content = serde_json::to_string(&entry)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Clears all cached entries.
    ///
    /// This removes all JSON files from the cache directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache directory cannot be read.
    pub fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            for entry in fs::read_dir(&self.dir)?.flatten() {
                let path = entry.path();
                if path.extension().map(|e| e == "json").unwrap_or(false) {
                    let _ = fs::remove_file(path);
                }
            }
        }
        Ok(())
    }
}

impl Default for Cache {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the cache directory for raystat.
///
/// Falls back to `/tmp/raystat/` if no cache directory can be determined.
fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("raystat")
}
