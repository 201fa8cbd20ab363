//! Service worker caching policy.
//!
//! Versioned precache at install, stale-cache garbage collection at
//! activate, and cache-first fetch interception with a runtime cache
//! and an offline document fallback — the whole policy of the KOASA
//! worker script.
//!
//! Interception applies only to same-origin GETs and to the pinned CDN
//! host serving the CSS/JS framework; everything else passes through
//! untouched.

use serde::{Deserialize, Serialize};

use crate::cache_storage::CacheError;
use crate::fetch::{resolve_url, Destination, FetchRequest, FetchResponse, Method, Network, NetworkError};
use crate::SharedCacheStorage;

// ── Constants ───────────────────────────────────────────────

/// Versioned static-asset cache. Bumping the version retires the old
/// cache at the next activation.
pub const STATIC_CACHE: &str = "koasa-v1.0.0";

/// Runtime cache populated opportunistically during normal use.
pub const RUNTIME_CACHE: &str = "koasa-runtime";

/// The one cross-origin host the worker is allowed to intercept.
pub const CDN_HOST: &str = "cdnjs.cloudflare.com";

/// Assets cached at install time: own static assets plus the pinned
/// CDN builds of the CSS/JS framework dependencies.
pub const PRECACHE_URLS: &[&str] = &[
    "/",
    "/static/css/style.css",
    "/static/js/main.js",
    "/static/favicon.ico",
    "https://cdnjs.cloudflare.com/ajax/libs/bootstrap/5.3.2/css/bootstrap.min.css",
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/6.4.2/css/all.min.css",
    "https://cdnjs.cloudflare.com/ajax/libs/bootstrap/5.3.2/js/bootstrap.bundle.min.js",
];

// ── Types ───────────────────────────────────────────────────

/// Worker-side errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PwaError {
    /// A precache manifest entry could not be fetched or was not a
    /// well-formed success; nothing was committed.
    #[error("precache fetch failed: {url}")]
    PrecacheFailed { url: String },
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Control messages the page can post to the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WorkerMessage {
    /// Ask a waiting worker version to activate immediately.
    #[serde(rename = "SKIP_WAITING")]
    SkipWaiting,
}

impl WorkerMessage {
    /// Parse a posted JSON message; unknown messages are ignored.
    pub fn from_json(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

/// Where an intercepted response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    StaticCache,
    RuntimeCache,
    Network,
    /// Cached root page served because the network failed on a
    /// navigation.
    OfflineFallback,
}

/// Result of running a request through the fetch policy.
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// The worker answers the request.
    Response {
        response: FetchResponse,
        source: FetchSource,
    },
    /// Not intercepted — the platform fetches normally.
    Passthrough,
    /// Network failed and no fallback applied; the fetch stays
    /// unresolved.
    Failed(NetworkError),
}

/// The KOASA service worker.
pub struct ServiceWorker {
    origin: String,
    static_cache: String,
    runtime_cache: String,
    precache: Vec<String>,
    /// This version requests immediate activation after install.
    skip_waiting: bool,
    /// Whether `activate` claimed the open clients.
    claimed: bool,
}

// ── Implementation ──────────────────────────────────────────

impl ServiceWorker {
    /// Worker for the given origin with the release cache names and
    /// precache manifest.
    pub fn new(origin: &str) -> Self {
        Self::with_config(origin, STATIC_CACHE, RUNTIME_CACHE, PRECACHE_URLS)
    }

    /// Worker with explicit cache names and manifest (version rollout
    /// and tests).
    pub fn with_config(
        origin: &str,
        static_cache: &str,
        runtime_cache: &str,
        precache: &[&str],
    ) -> Self {
        Self {
            origin: String::from(origin),
            static_cache: String::from(static_cache),
            runtime_cache: String::from(runtime_cache),
            precache: precache.iter().map(|s| String::from(*s)).collect(),
            skip_waiting: true,
            claimed: false,
        }
    }

    pub fn static_cache(&self) -> &str {
        &self.static_cache
    }

    pub fn runtime_cache(&self) -> &str {
        &self.runtime_cache
    }

    pub fn skip_waiting_requested(&self) -> bool {
        self.skip_waiting
    }

    pub fn clients_claimed(&self) -> bool {
        self.claimed
    }

    /// Install: fetch the whole precache manifest, then commit it to
    /// the static cache.
    ///
    /// All-or-nothing: any fetch failure or non-cacheable response
    /// aborts the install and nothing is written, leaving whatever the
    /// previous version cached fully intact.
    pub fn install(
        &mut self,
        net: &dyn Network,
        caches: &SharedCacheStorage,
    ) -> Result<(), PwaError> {
        log::info!("[SW] installing, precaching {} assets", self.precache.len());

        // Stage every response before touching the cache.
        let mut staged = Vec::with_capacity(self.precache.len());
        for path in &self.precache {
            let url = resolve_url(&self.origin, path);
            let request = FetchRequest::get(&url);
            match net.fetch(&request) {
                Ok(response) if response.is_cacheable() => staged.push(response),
                Ok(_) | Err(_) => {
                    log::warn!("[SW] precache failed for {}", url);
                    return Err(PwaError::PrecacheFailed { url });
                }
            }
        }

        // Commit the staged batch.
        let mut storage = caches.write();
        for response in &staged {
            storage.put(&self.static_cache, response)?;
        }

        log::info!("[SW] precache complete ({})", self.static_cache);
        Ok(())
    }

    /// Activate: garbage-collect every cache that belongs to neither
    /// this version nor the runtime, then take control of all open
    /// pages. Returns the deleted cache names.
    pub fn activate(&mut self, caches: &SharedCacheStorage) -> Vec<String> {
        let deleted = caches
            .write()
            .delete_except(&[self.static_cache.as_str(), self.runtime_cache.as_str()]);

        for name in &deleted {
            log::info!("[SW] deleted stale cache: {}", name);
        }

        self.claimed = true;
        deleted
    }

    /// Run one request through the fetch policy.
    pub fn handle_fetch(
        &self,
        request: &FetchRequest,
        net: &dyn Network,
        caches: &SharedCacheStorage,
    ) -> FetchResult {
        // Non-read requests are never intercepted.
        if request.method != Method::Get {
            log::debug!("[SW] ignoring {} {}", request.method.as_str(), request.url);
            return FetchResult::Passthrough;
        }

        // Same-origin and the pinned CDN host only.
        let same_origin = request.origin().as_deref() == Some(self.origin.as_str());
        let pinned_cdn = request.host().as_deref() == Some(CDN_HOST);
        if !same_origin && !pinned_cdn {
            return FetchResult::Passthrough;
        }

        // Cache first: the precached static assets, then the runtime
        // cache.
        {
            let storage = caches.read();
            if let Some(hit) = storage.match_in(&self.static_cache, &request.url) {
                log::debug!("[SW] static cache hit: {}", request.url);
                return FetchResult::Response {
                    response: hit.to_response(),
                    source: FetchSource::StaticCache,
                };
            }
            if let Some(hit) = storage.match_in(&self.runtime_cache, &request.url) {
                log::debug!("[SW] runtime cache hit: {}", request.url);
                return FetchResult::Response {
                    response: hit.to_response(),
                    source: FetchSource::RuntimeCache,
                };
            }
        }

        // Miss: go to the network, caching well-formed successes.
        match net.fetch(request) {
            Ok(response) => {
                if response.is_cacheable() {
                    if let Err(e) = caches.write().put(&self.runtime_cache, &response) {
                        log::warn!("[SW] runtime cache store failed: {}", e);
                    }
                }
                FetchResult::Response {
                    response,
                    source: FetchSource::Network,
                }
            }
            Err(e) => {
                // Offline navigation falls back to the cached root page.
                if request.destination == Destination::Document {
                    let root = resolve_url(&self.origin, "/");
                    if let Some(hit) = caches.read().match_url(&root) {
                        log::debug!("[SW] offline fallback for {}", request.url);
                        return FetchResult::Response {
                            response: hit.1.to_response(),
                            source: FetchSource::OfflineFallback,
                        };
                    }
                }
                FetchResult::Failed(e)
            }
        }
    }

    /// Handle a message posted by a page.
    pub fn on_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::SkipWaiting => {
                self.skip_waiting = true;
            }
        }
    }
}

// ── Tests ───────────────────────────────────────────────────
