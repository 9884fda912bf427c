//! File-based tab store.
//!
//! [`FileTabStore`] keeps every selection in a single JSON object:
//!
//! ```text
//! {
//!   "lang": "Rust",
//!   "package-manager": "pnpm"
//! }
//! ```
//!
//! The file is read once on construction and rewritten on every `set`.
//! A missing or unreadable file starts an empty store.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::TabStore;

/// [`TabStore`] persisted to a JSON file.
pub struct FileTabStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileTabStore {
    /// Open the store at `path`, loading existing selections.
    ///
    /// Load errors are logged and never fatal.
    #[must_use]
    pub fn open(path: PathBuf) -> Self {
        let entries = load_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TabStore for FileTabStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, title: &str) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };
        if entries.get(key).is_some_and(|current| current == title) {
            return;
        }
        entries.insert(key.to_owned(), title.to_owned());

        let json = match serde_json::to_vec_pretty(&*entries) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize tab selections: {e}");
                return;
            }
        };
        if let Some(parent) = self.path.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            tracing::warn!("failed to create tab store directory: {e}");
            return;
        }
        if let Err(e) = fs::write(&self.path, json) {
            tracing::warn!("failed to write tab store {}: {e}", self.path.display());
        }
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no tab store at {}, starting empty", path.display());
            return BTreeMap::new();
        }
        Err(e) => {
            tracing::warn!("failed to read tab store {}: {e}", path.display());
            return BTreeMap::new();
        }
    };
    serde_json::from_slice(&data).unwrap_or_else(|e| {
        tracing::warn!("ignoring malformed tab store {}: {e}", path.display());
        BTreeMap::new()
    })
}
