//! In-memory keyed store.

use crate::error::{Result, TelemetryError};
use parking_lot::RwLock;
use std::collections::BTreeMap;

use super::{Keyed, KeyedStore};

/// Keyed store backed by an ordered map behind a reader/writer lock.
pub struct MemoryStore<T> {
    items: RwLock<BTreeMap<String, T>>,
}

impl<T> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> KeyedStore<T> for MemoryStore<T>
where
    T: Keyed + Clone + Send + Sync,
{
    fn get(&self, key: &str) -> Result<T> {
        self.items
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| TelemetryError::NotFound(key.to_string()))
    }

    fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.items.read().values().cloned().collect())
    }

    fn put(&self, item: T) -> Result<()> {
        let key = item.key().to_string();
        self.items.write().insert(key, item);
        Ok(())
    }
}
