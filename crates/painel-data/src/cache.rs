//! Memoisation of [`load_all`] keyed on input identity.

use crate::config::SourceConfig;
use crate::error::{DataError, Result};
use crate::pipeline::{UnifiedRecords, load_all};
use crate::source::SourceFingerprint;
use moka::sync::Cache;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

/// Default number of distinct input sets kept.
const DEFAULT_CACHE_CAPACITY: u64 = 4;

/// Cache of unified record sets.
///
/// Entries are keyed by a [`SourceFingerprint`]: while the five files keep
/// their length and modification time, and the configuration is unchanged,
/// [`PipelineCache::get_or_load`] returns the stored set without reading or
/// joining anything. Entries never expire on their own.
pub struct PipelineCache {
    entries: Cache<SourceFingerprint, UnifiedRecords>,
    loads: AtomicUsize,
}

impl std::fmt::Debug for PipelineCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineCache")
            .field("loads", &self.loads())
            .finish_non_exhaustive()
    }
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineCache {
    /// Create a cache with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CACHE_CAPACITY)
    }

    /// Create a cache holding at most `max_capacity` input sets.
    pub fn with_capacity(max_capacity: u64) -> Self {
        Self {
            entries: Cache::builder().max_capacity(max_capacity).build(),
            loads: AtomicUsize::new(0),
        }
    }

    /// Return the unified records for `config`, loading them on a miss.
    ///
    /// # Errors
    ///
    /// Propagates any error from fingerprinting or from [`load_all`].
    pub fn get_or_load(&self, config: &SourceConfig) -> Result<UnifiedRecords> {
        let fingerprint = SourceFingerprint::capture(config)?;

        if let Some(records) = self.entries.get(&fingerprint) {
            debug!(rows = records.len(), "pipeline cache hit");
            return Ok(records);
        }

        // Concurrent misses on one fingerprint wait for a single load.
        self.entries
            .try_get_with(fingerprint, || {
                debug!(data_dir = %config.data_dir.display(), "pipeline cache miss");
                let records = load_all(config)?;
                self.loads.fetch_add(1, Ordering::Relaxed);
                Ok::<_, DataError>(records)
            })
            .map_err(|e| Arc::try_unwrap(e).unwrap_or_else(DataError::Shared))
    }

    /// Drop every cached set.
    pub fn invalidate(&self) {
        self.entries.invalidate_all();
    }

    /// Number of times the pipeline actually ran.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }
}
