//! Caching layer for parsed publications.
//!
//! Parsing a publication means downloading and unpacking an archive, so the
//! parsed schedule is kept for a week. Entries are keyed by a digest of the
//! resolved file URL: different request shapes that land on the same file
//! share one entry.
//!
//! Freshness is checked at read time against the injected clock. The moka
//! TTL and capacity bound memory; they are not what decides a hit.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use moka::future::Cache as MokaCache;
use sha2::{Digest, Sha256};

use crate::clock::Clock;
use crate::domain::ScheduleItem;

/// One week.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Longest TTL the moka builder accepts (1000 years).
pub const MAX_TTL: Duration = Duration::from_secs(1000 * 365 * 24 * 60 * 60);

/// Parsed schedule shared between the cache and responses.
pub type Payload = Arc<Vec<ScheduleItem>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long an entry stays fresh after insertion.
    pub ttl: Duration,

    /// Maximum number of cached publications.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_capacity: 10_000,
        }
    }
}

/// A cached parse result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub fingerprint: String,
    pub payload: Payload,
    pub inserted_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Whole seconds since insertion, never negative.
    pub fn age_secs(&self, now: DateTime<Utc>) -> u64 {
        (now - self.inserted_at).num_seconds().max(0) as u64
    }

    fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = (now - self.inserted_at).to_std().unwrap_or(Duration::ZERO);
        age < ttl
    }
}

/// Cache key for a source URL: hex SHA-256 of the URL text.
///
/// # Examples
///
/// ```
/// use schedule_server::cache::fingerprint_of;
///
/// let a = fingerprint_of("https://cdn.example/mwb_E_202411.jwpub");
/// assert_eq!(a, fingerprint_of("https://cdn.example/mwb_E_202411.jwpub"));
/// assert_ne!(a, fingerprint_of("https://cdn.example/mwb_E_202409.jwpub"));
/// assert_eq!(a.len(), 64);
/// ```
pub fn fingerprint_of(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}

/// In-process cache of parsed publications.
pub struct ScheduleCache {
    entries: MokaCache<String, CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ScheduleCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        let entries = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            entries,
            ttl: config.ttl,
            clock,
        }
    }

    /// Get a fresh entry. Stale entries read as absent.
    pub async fn get(&self, fingerprint: &str) -> Option<CacheEntry> {
        let entry = self.entries.get(fingerprint).await?;
        entry
            .is_fresh(self.clock.now(), self.ttl)
            .then_some(entry)
    }

    /// Store a payload, replacing whatever was there.
    pub async fn put(&self, fingerprint: String, payload: Payload) -> CacheEntry {
        let entry = CacheEntry {
            fingerprint: fingerprint.clone(),
            payload,
            inserted_at: self.clock.now(),
        };
        self.entries.insert(fingerprint, entry.clone()).await;
        entry
    }
}
