//! Process-wide POI state shared by the sync cycle and the resource façade.

use std::sync::Arc;

use super::detail_cache::DetailCache;
use super::resources::ResourceStore;

/// Detail cache plus resource buckets. Both live for the whole process.
///
/// The sync cycle is the only writer; façade providers hold the same `Arc`
/// and observe live data.
#[derive(Debug, Default)]
pub struct PoiState {
    /// Resolved POI details keyed by id.
    pub details: DetailCache,
    /// Classified resource buckets.
    pub resources: ResourceStore,
}

impl PoiState {
    /// Shared state with an unbounded detail cache.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Shared state whose detail cache holds at most `capacity` entries.
    pub fn with_cache_capacity(capacity: Option<usize>) -> Arc<Self> {
        Arc::new(Self {
            details: DetailCache::with_capacity(capacity),
            resources: ResourceStore::new(),
        })
    }
}
