//! Last-known-good rate cache with per-entry TTL.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tracing::debug;

use conversion_types::{CurrencyPair, Rate};

/// TTL applied when the caller has no opinion.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(2 * 60 * 60);

#[derive(Debug, Clone, Copy)]
struct CacheEntry {
    rate: Rate,
    expires_at: Instant,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Counts of live and expired entries at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub total_entries: usize,
    pub valid_entries: usize,
    pub expired_entries: usize,
}

/// Thread-safe rate cache keyed by currency pair.
///
/// Written after every successful remote fetch, read by the cached fallback
/// provider. Expired entries are never returned.
#[derive(Debug, Default)]
pub struct RateCache {
    entries: DashMap<CurrencyPair, CacheEntry>,
}

impl RateCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached rate if it has not expired.
    ///
    /// An expired entry is removed on the way out.
    pub fn get(&self, pair: &CurrencyPair) -> Option<Rate> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(pair) {
            if !entry.is_expired(now) {
                debug!(pair = %pair, "Cache hit");
                return Some(entry.rate);
            }
            // Release the shard lock before removing
            drop(entry);
            // A concurrent put may have refreshed the entry meanwhile
            self.entries.remove_if(pair, |_, entry| entry.is_expired(now));
            debug!(pair = %pair, "Cache entry expired");
            return None;
        }

        debug!(pair = %pair, "Cache miss");
        None
    }

    /// Stores or replaces the rate for `pair`, valid for `ttl` from now.
    pub fn put(&self, pair: CurrencyPair, rate: Rate, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.entries.insert(pair, CacheEntry { rate, expires_at });
    }

    /// [`put`](Self::put) with [`DEFAULT_CACHE_TTL`].
    pub fn put_default(&self, pair: CurrencyPair, rate: Rate) {
        self.put(pair, rate, DEFAULT_CACHE_TTL);
    }

    pub fn remove(&self, pair: &CurrencyPair) -> Option<Rate> {
        self.entries.remove(pair).map(|(_, entry)| entry.rate)
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Drops every expired entry; returns how many were removed.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let total = self.entries.len();
        let valid = self
            .entries
            .iter()
            .filter(|entry| !entry.is_expired(now))
            .count();

        CacheStats {
            total_entries: total,
            valid_entries: valid,
            expired_entries: total.saturating_sub(valid),
        }
    }

    /// Entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Spawns a background task sweeping expired entries every `interval`.
    ///
    /// The task runs until aborted.
    pub fn spawn_sweeper(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = self.sweep_expired();
                if removed > 0 {
                    debug!(removed, remaining = self.len(), "Swept expired cache entries");
                }
            }
        })
    }
}
