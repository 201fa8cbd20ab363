//! Cache storage.
//!
//! Named response caches for the service worker: the versioned static
//! cache filled at install time and the runtime cache filled
//! opportunistically. One origin, one storage; both execution contexts
//! reach it through [`crate::SharedCacheStorage`].
//!
//! Entry age for eviction comes from a monotonic put counter, so LRU
//! order is deterministic without a clock.

use std::collections::BTreeMap;

use crate::fetch::{FetchResponse, ResponseType};

// ── Constants ───────────────────────────────────────────────

/// Maximum combined cache size for the origin (25 MB).
const MAX_CACHE_SIZE: usize = 25 * 1024 * 1024;

/// Estimated per-entry overhead beyond the body bytes.
const ENTRY_OVERHEAD: usize = 256;

// ── Types ───────────────────────────────────────────────────

/// A single cached response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    /// The request URL this response is keyed on.
    pub url: String,
    pub status: u16,
    pub response_type: ResponseType,
    pub headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// Monotonic insertion tick, used for LRU eviction.
    pub cached_at: u64,
    /// Size in bytes (body + overhead).
    pub size: usize,
}

impl CachedResponse {
    /// Rebuild a platform response from the cached copy.
    pub fn to_response(&self) -> FetchResponse {
        FetchResponse {
            url: self.url.clone(),
            status: self.status,
            response_type: self.response_type,
            headers: self.headers.clone(),
            body: self.body.clone(),
        }
    }
}

/// A named cache.
#[derive(Debug, Clone)]
pub struct Cache {
    pub name: String,
    /// URL → CachedResponse.
    entries: BTreeMap<String, CachedResponse>,
    total_size: usize,
}

/// All named caches for the origin.
pub struct CacheStorage {
    caches: BTreeMap<String, Cache>,
    total_size: usize,
    /// Monotonic put counter feeding `cached_at`.
    tick: u64,
}

/// Cache storage error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CacheError {
    #[error("cache not found")]
    NotFound,
    #[error("cache quota exceeded (25MB)")]
    QuotaExceeded,
}

// ── Cache ───────────────────────────────────────────────────

impl Cache {
    pub fn new(name: &str) -> Self {
        Self {
            name: String::from(name),
            entries: BTreeMap::new(),
            total_size: 0,
        }
    }

    /// Store a response under its URL, replacing any previous entry.
    fn put(&mut self, url: &str, response: CachedResponse) {
        if let Some(old) = self.entries.remove(url) {
            self.total_size = self.total_size.saturating_sub(old.size);
        }
        self.total_size += response.size;
        self.entries.insert(String::from(url), response);
    }

    /// Look up a cached response by URL.
    pub fn match_url(&self, url: &str) -> Option<&CachedResponse> {
        self.entries.get(url)
    }

    /// Delete an entry by URL.
    pub fn delete(&mut self, url: &str) -> bool {
        if let Some(entry) = self.entries.remove(url) {
            self.total_size = self.total_size.saturating_sub(entry.size);
            true
        } else {
            false
        }
    }

    /// All cached URLs.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size(&self) -> usize {
        self.total_size
    }

    /// Evict the oldest entry (LRU by `cached_at`).
    fn evict_lru(&mut self) -> Option<String> {
        let oldest_url = self
            .entries
            .iter()
            .min_by_key(|(_, v)| v.cached_at)
            .map(|(k, _)| k.clone());

        if let Some(ref url) = oldest_url {
            self.delete(url);
        }
        oldest_url
    }

    fn oldest_tick(&self) -> u64 {
        self.entries
            .values()
            .map(|e| e.cached_at)
            .min()
            .unwrap_or(u64::MAX)
    }
}

// ── CacheStorage ────────────────────────────────────────────

impl CacheStorage {
    pub fn new() -> Self {
        Self {
            caches: BTreeMap::new(),
            total_size: 0,
            tick: 0,
        }
    }

    /// Open (or create) a named cache.
    pub fn open(&mut self, cache_name: &str) -> &mut Cache {
        self.caches
            .entry(String::from(cache_name))
            .or_insert_with(|| Cache::new(cache_name))
    }

    pub fn has(&self, cache_name: &str) -> bool {
        self.caches.contains_key(cache_name)
    }

    /// Delete a named cache with all its entries.
    pub fn delete(&mut self, cache_name: &str) -> bool {
        if let Some(cache) = self.caches.remove(cache_name) {
            self.total_size = self.total_size.saturating_sub(cache.size());
            true
        } else {
            false
        }
    }

    /// Delete every cache whose name is not in `keep`; returns the
    /// deleted names. This is the activation garbage-collection step.
    pub fn delete_except(&mut self, keep: &[&str]) -> Vec<String> {
        let stale: Vec<String> = self
            .caches
            .keys()
            .filter(|name| !keep.contains(&name.as_str()))
            .cloned()
            .collect();

        for name in &stale {
            self.delete(name);
        }
        stale
    }

    /// All cache names.
    pub fn keys(&self) -> Vec<&str> {
        self.caches.keys().map(|s| s.as_str()).collect()
    }

    /// Store a response in the named cache, enforcing the quota with
    /// cross-cache LRU eviction.
    pub fn put(&mut self, cache_name: &str, response: &FetchResponse) -> Result<(), CacheError> {
        let entry_size = response.body.len() + ENTRY_OVERHEAD;

        if self.total_size + entry_size > MAX_CACHE_SIZE {
            self.evict_to_fit(entry_size)?;
        }

        self.tick += 1;
        let entry = CachedResponse {
            url: response.url.clone(),
            status: response.status,
            response_type: response.response_type,
            headers: response.headers.clone(),
            body: response.body.clone(),
            cached_at: self.tick,
            size: entry_size,
        };

        let url = response.url.clone();
        self.open(cache_name).put(&url, entry);
        self.total_size = self.caches.values().map(|c| c.size()).sum();

        Ok(())
    }

    /// Match a URL across all caches (first hit in name order).
    pub fn match_url(&self, url: &str) -> Option<(&str, &CachedResponse)> {
        for (name, cache) in &self.caches {
            if let Some(resp) = cache.match_url(url) {
                return Some((name.as_str(), resp));
            }
        }
        None
    }

    /// Match a URL in a specific cache.
    pub fn match_in(&self, cache_name: &str, url: &str) -> Option<&CachedResponse> {
        self.caches.get(cache_name)?.match_url(url)
    }

    /// Total storage used across all caches.
    pub fn total_size(&self) -> usize {
        self.total_size
    }

    pub fn max_size(&self) -> usize {
        MAX_CACHE_SIZE
    }

    /// Evict LRU entries across all caches until `needed` bytes fit.
    fn evict_to_fit(&mut self, needed: usize) -> Result<(), CacheError> {
        while self.total_size + needed > MAX_CACHE_SIZE {
            let oldest_cache = self
                .caches
                .iter()
                .filter(|(_, c)| !c.is_empty())
                .min_by_key(|(_, c)| c.oldest_tick())
                .map(|(name, _)| name.clone());

            let Some(cache_name) = oldest_cache else {
                break;
            };
            let Some(cache) = self.caches.get_mut(&cache_name) else {
                break;
            };
            if cache.evict_lru().is_none() {
                break;
            }
            self.total_size = self.caches.values().map(|c| c.size()).sum();
        }

        if self.total_size + needed > MAX_CACHE_SIZE {
            Err(CacheError::QuotaExceeded)
        } else {
            Ok(())
        }
    }
}

impl Default for CacheStorage {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tests ───────────────────────────────────────────────────
