//! Session storage.
//!
//! Key-value storage scoped to one tab's session, per W3C Web Storage
//! semantics: string keys and values, a 5 MB per-origin quota, cleared
//! when the session ends. The cart persists its snapshot here under
//! [`crate::CART_KEY`]; the page shell may implement [`SessionStore`]
//! over the platform's real `sessionStorage`.

use std::collections::BTreeMap;

// ── Constants ───────────────────────────────────────────────

/// Maximum storage per origin (5 MB, keys + values combined).
const MAX_STORAGE_SIZE: usize = 5 * 1024 * 1024;

// ── Types ───────────────────────────────────────────────────

/// Error type for storage operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    /// Key + value would exceed the per-origin quota.
    #[error("QuotaExceededError")]
    QuotaExceeded,
}

/// Session-scoped key-value storage capability.
pub trait SessionStore {
    /// Get a stored value by key.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Store a value. Fails with `QuotaExceeded` when the write would
    /// exceed the quota; the store is left unchanged in that case.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. No-op when absent.
    fn remove_item(&mut self, key: &str);

    /// Drop every key.
    fn clear(&mut self);

    /// Number of stored keys.
    fn length(&self) -> usize;
}

/// In-memory `SessionStore` with quota accounting.
pub struct MemoryStore {
    data: BTreeMap<String, String>,
    /// Current total size (keys + values in bytes).
    current_size: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: BTreeMap::new(),
            current_size: 0,
        }
    }

    /// Current byte usage.
    pub fn size(&self) -> usize {
        self.current_size
    }

    /// Maximum byte capacity.
    pub fn max_size(&self) -> usize {
        MAX_STORAGE_SIZE
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.data.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let new_entry_size = key.len() + value.len();

        // Size delta against any entry being overwritten.
        let old_entry_size = self
            .data
            .get(key)
            .map(|v| key.len() + v.len())
            .unwrap_or(0);
        let projected = self.current_size - old_entry_size + new_entry_size;

        if projected > MAX_STORAGE_SIZE {
            return Err(StorageError::QuotaExceeded);
        }

        self.data.insert(String::from(key), String::from(value));
        self.current_size = projected;

        Ok(())
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(value) = self.data.remove(key) {
            self.current_size = self.current_size.saturating_sub(key.len() + value.len());
        }
    }

    fn clear(&mut self) {
        self.data.clear();
        self.current_size = 0;
    }

    fn length(&self) -> usize {
        self.data.len()
    }
}

// ── Tests ───────────────────────────────────────────────────
