//! In-memory attribute map cache.
//!
//! Holds one [`AttributeMap`] per entity logical name so repeated query
//! compilation does not repeat metadata round trips.
//!
//! # Design
//!
//! - Keyed by logical name, exactly as given (no case folding)
//! - No TTL - entries live until [`AttributeMapCache::delete`] or
//!   [`AttributeMapCache::clear`]
//! - Process memory only - nothing survives a restart
//!
//! Entries are stale as soon as the entity's schema is customized. Whoever
//! learns of a schema change must delete the entry.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::metadata::AttributeMap;

/// Cache of attribute maps keyed by entity logical name.
#[derive(Debug, Default)]
pub struct AttributeMapCache {
    entries: DashMap<String, Arc<AttributeMap>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl AttributeMapCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the map for `logical_name`, recording a hit or miss.
    pub fn get(&self, logical_name: &str) -> Option<Arc<AttributeMap>> {
        match self.entries.get(logical_name) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(entry.value()))
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Check for an entry without touching the hit/miss counters.
    pub fn contains(&self, logical_name: &str) -> bool {
        self.entries.contains_key(logical_name)
    }

    /// Store a map, replacing any previous entry.
    pub fn set(&self, logical_name: impl Into<String>, map: Arc<AttributeMap>) {
        self.entries.insert(logical_name.into(), map);
    }

    /// Delete an entry. Returns true if one was present.
    pub fn delete(&self, logical_name: &str) -> bool {
        self.entries.remove(logical_name).is_some()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Logical names currently cached, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cached entities.
    pub entry_count: usize,
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that found nothing.
    pub misses: u64,
}
