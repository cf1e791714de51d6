//! Per-session image URL cache
//!
//! Keys are normalised descriptions. Each key owns a `OnceCell`, so
//! concurrent lookups for the same key share one in-flight generation.
//! There is no eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OnceCell;
use tracing::debug;

#[derive(Debug, Default)]
pub struct ImageCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<String>>>>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache key for a description: lower-cased and trimmed
    pub fn normalize(description: &str) -> String {
        description.trim().to_lowercase()
    }

    /// Cell for a key, created on first use
    ///
    /// The map lock is released before the caller awaits the cell.
    pub fn cell(&self, key: &str) -> Arc<OnceCell<String>> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cell) = entries.get(key) {
            debug!(%key, "ImageCache::cell: existing entry");
            return cell.clone();
        }
        debug!(%key, "ImageCache::cell: new entry");
        let cell = Arc::new(OnceCell::new());
        entries.insert(key.to_string(), cell.clone());
        cell
    }

    /// Completed URL for a key, if any
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).and_then(|cell| cell.get().cloned())
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
