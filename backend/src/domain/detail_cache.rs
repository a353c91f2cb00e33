//! Process-lifetime cache of resolved POI details.
//!
//! Each id owns one slot. The first caller to reach an empty slot fetches;
//! concurrent callers for the same id wait on that fetch instead of issuing
//! their own, so a successful detail is fetched at most once. A failed fetch
//! leaves the slot empty; the next waiter or a later call retries in it.
//! Entries never expire.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use super::poi::{PoiDetail, PoiId};

type Slot = Arc<OnceCell<Arc<PoiDetail>>>;

/// How a detail was obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Served from the cache without calling the resolver.
    Hit(Arc<PoiDetail>),
    /// Resolved by this call and stored.
    Fetched(Arc<PoiDetail>),
    /// Resolved by this call but not stored because the cache is full.
    Uncached(Arc<PoiDetail>),
}

impl CacheLookup {
    /// The detail, however it was obtained.
    pub fn detail(&self) -> &Arc<PoiDetail> {
        match self {
            Self::Hit(detail) | Self::Fetched(detail) | Self::Uncached(detail) => detail,
        }
    }
}

/// Id-keyed detail cache with single-flight resolution.
#[derive(Debug, Default)]
pub struct DetailCache {
    slots: Mutex<HashMap<PoiId, Slot>>,
    capacity: Option<usize>,
}

impl DetailCache {
    /// Unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `capacity` resolved ids; `None` means unbounded.
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        Self {
            slots: Mutex::default(),
            capacity,
        }
    }

    /// Cached detail for `id`, if resolved.
    pub fn get(&self, id: &PoiId) -> Option<Arc<PoiDetail>> {
        self.lock_slots().get(id).and_then(|slot| slot.get().cloned())
    }

    /// Number of resolved entries.
    pub fn len(&self) -> usize {
        self.lock_slots()
            .values()
            .filter(|slot| slot.initialized())
            .count()
    }

    /// Whether no entry has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached detail for `id`, or run `resolve` to obtain it.
    ///
    /// # Errors
    ///
    /// Returns the resolver's error; nothing is cached in that case.
    pub async fn get_or_resolve<F, Fut, E>(&self, id: &PoiId, resolve: F) -> Result<CacheLookup, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PoiDetail, E>>,
    {
        let Some(slot) = self.claim_slot(id) else {
            let detail = resolve().await?;
            return Ok(CacheLookup::Uncached(Arc::new(detail)));
        };

        if let Some(detail) = slot.get() {
            return Ok(CacheLookup::Hit(Arc::clone(detail)));
        }

        let resolved_here = AtomicBool::new(false);
        let flag = &resolved_here;
        let detail = slot
            .get_or_try_init(move || async move {
                flag.store(true, Ordering::Release);
                resolve().await.map(Arc::new)
            })
            .await?;

        if resolved_here.load(Ordering::Acquire) {
            Ok(CacheLookup::Fetched(Arc::clone(detail)))
        } else {
            Ok(CacheLookup::Hit(Arc::clone(detail)))
        }
    }

    fn claim_slot(&self, id: &PoiId) -> Option<Slot> {
        let mut slots = self.lock_slots();
        if let Some(slot) = slots.get(id) {
            return Some(Arc::clone(slot));
        }
        // Only resolved slots count; concurrent first fetches may overshoot briefly.
        let resolved = slots.values().filter(|slot| slot.initialized()).count();
        if self.capacity.is_some_and(|capacity| resolved >= capacity) {
            return None;
        }
        let slot = Slot::default();
        slots.insert(id.clone(), Arc::clone(&slot));
        Some(slot)
    }

    fn lock_slots(&self) -> MutexGuard<'_, HashMap<PoiId, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
