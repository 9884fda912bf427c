//! Tab selection persistence for RW.
//!
//! Code groups that carry a storage key remember which tab the reader picked,
//! so every group sharing the key opens on the same tab. This crate provides
//! the key-value abstraction the renderer writes that choice to:
//!
//! - [`TabStore`]: get/set a tab title by storage key
//!
//! # Implementations
//!
//! - [`NullTabStore`]: no-op (always misses)
//! - [`MemoryTabStore`]: in-process map
//! - [`FileTabStore`]: JSON file on disk
//!
//! # Example
//!
//! ```
//! use rw_tabstore::{MemoryTabStore, TabStore};
//!
//! let store = MemoryTabStore::new();
//! store.set("package-manager", "pnpm");
//! assert_eq!(store.get("package-manager").as_deref(), Some("pnpm"));
//! ```

mod file;
pub use file::FileTabStore;

use std::collections::HashMap;
use std::sync::RwLock;

/// Persisted tab selection keyed by storage key.
///
/// Values are tab titles. Stores never fail: write errors are logged and
/// dropped, since a lost selection only means the first tab shows next time.
pub trait TabStore: Send + Sync {
    /// Title stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `title` under `key`, replacing any previous value.
    fn set(&self, key: &str, title: &str);
}

/// No-op [`TabStore`].
///
/// Every `get` returns `None`; every `set` is discarded.
pub struct NullTabStore;

impl TabStore for NullTabStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, _key: &str, _title: &str) {}
}

/// In-memory [`TabStore`].
#[derive(Debug, Default)]
pub struct MemoryTabStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTabStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TabStore for MemoryTabStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, title: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.to_owned(), title.to_owned());
        }
    }
}
