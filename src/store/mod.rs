//! Keyed snapshot storage.
//!
//! The store owns the authoritative copy of every entity. Callers only ever
//! receive clones, so nothing outside the store can mutate shared state.

mod memory;

pub use memory::MemoryStore;

use crate::error::Result;

/// Something stored under a unique string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Thread-safe mapping from key to current snapshot.
///
/// Every operation is individually atomic. A `get` followed by a `put` is
/// not; callers that read-modify-write must tolerate concurrent writers.
pub trait KeyedStore<T>: Send + Sync {
    /// Look up one item. Fails with `NotFound` for an unknown key.
    fn get(&self, key: &str) -> Result<T>;

    /// All items, ordered by key ascending.
    fn get_all(&self) -> Result<Vec<T>>;

    /// Insert or replace the item under its own key.
    fn put(&self, item: T) -> Result<()>;
}
