//! Content-addressed memo cache for statement loads.
//!
//! Key: BLAKE3 hash of the uploaded bytes. Each entry is written once and then
//! shared read-only as `Arc<FinancialTable>`. Parse failures are not cached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::loader::{load_table, ParseError};
use crate::record::FinancialTable;

/// Process-lifetime cache of parsed statement tables.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: RwLock<HashMap<blake3::Hash, Arc<FinancialTable>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl LoadCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content key for an input artifact.
    pub fn key(bytes: &[u8]) -> blake3::Hash {
        blake3::hash(bytes)
    }

    /// Return the cached table for these bytes, parsing them on first sight.
    pub fn load(&self, bytes: &[u8]) -> Result<Arc<FinancialTable>, ParseError> {
        let key = Self::key(bytes);

        if let Some(table) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(key = %key.to_hex(), "statement cache hit");
            return Ok(table);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(key = %key.to_hex(), bytes = bytes.len(), "statement cache miss");
        let parsed = Arc::new(load_table(bytes)?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent loader may have won the race; keep the first entry.
        let table = entries.entry(key).or_insert(parsed);
        Ok(Arc::clone(table))
    }

    /// Cached table for a key, if present.
    pub fn get(&self, key: &blake3::Hash) -> Option<Arc<FinancialTable>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    pub fn contains(&self, bytes: &[u8]) -> bool {
        self.get(&Self::key(bytes)).is_some()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.read().unwrap_or_else(PoisonError::into_inner).len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}
