//! KOASA PWA shell.
//!
//! Two independent pieces: the page-side install flow (custom install
//! button fed by the platform's deferred prompt) and the service worker
//! (static-asset precache, versioned cache garbage collection, and the
//! cache-first fetch policy with an offline document fallback).
//!
//! The worker runs in its own execution context; the page shares nothing
//! with it but the cache storage and an explicit message channel.

pub mod cache_storage;
pub mod fetch;
pub mod host;
pub mod install;
pub mod worker;

use std::sync::Arc;

pub use cache_storage::{Cache, CacheError, CacheStorage, CachedResponse};
pub use fetch::{
    Destination, FetchRequest, FetchResponse, Method, Network, NetworkError, ResponseType,
    StaticNetwork,
};
pub use host::{HostError, UpdatePolicy, WorkerHost, WorkerId, WorkerRegistration, WorkerState};
pub use install::{
    DisplayMode, InstallFlow, InstallOutcome, InstallPrompt, InstallState, InstallUi,
};
pub use worker::{
    FetchResult, FetchSource, PwaError, ServiceWorker, WorkerMessage, CDN_HOST, PRECACHE_URLS,
    RUNTIME_CACHE, STATIC_CACHE,
};

/// Cache storage handle shared by the page and worker contexts.
pub type SharedCacheStorage = Arc<spin::RwLock<CacheStorage>>;

/// Fresh shared cache storage for a browsing session.
pub fn shared_cache_storage() -> SharedCacheStorage {
    Arc::new(spin::RwLock::new(CacheStorage::new()))
}
