//! Favorite tracks and their durable storage.
//!
//! The set lives in memory and is written through to a key-value store after
//! every change. Storage failures never roll back the in-memory set.

mod set;
mod store;

pub use set::FavoritesSet;
pub use store::{FAVORITES_KEY, FavoritesStore, JsonFileStore, KeyValueStore, MemoryStore};

#[cfg(test)]
pub(crate) use store::FailingStore;
