//! Domain orchestration for one POI synchronisation cycle.
//!
//! A cycle reads the current position, searches the remote service inside a
//! bounding box, resolves every returned POI (cache first) and republishes
//! it to the telemetry sink and the resource buckets. Remote failures are
//! logged and contained; the next scheduled cycle is the only retry.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::{StreamExt, stream};
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

use crate::domain::classifier::ResourceClassifier;
use crate::domain::detail_cache::CacheLookup;
use crate::domain::geo::{BoundingBox, compute_bounding_box};
use crate::domain::notes::NoteFormat;
use crate::domain::poi::{PoiDetail, PoiId};
use crate::domain::ports::{
    DEFAULT_SEARCH_ZOOM_LEVEL, PoiSearchRequest, PoiSource, PoiSourceError, PositionProvider,
    TelemetrySink, TelemetryUpdate,
};
use crate::domain::state::PoiState;

mod scheduler;

pub use scheduler::{PoiSyncSchedule, PoiSyncScheduler, SchedulerHandle};

/// Default half-diagonal of the search box, in kilometres.
pub const DEFAULT_SEARCH_RADIUS_KM: f64 = 50.0;

/// Cycle configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSyncConfig {
    /// Distance from the vessel to each search box corner.
    pub search_radius_km: f64,
    /// Zoom granularity sent with each search.
    pub zoom_level: u8,
    /// Short/long note derivation.
    pub note_format: NoteFormat,
    /// Upper bound on concurrent detail resolutions within one cycle.
    pub max_concurrent_detail_fetches: usize,
    /// Also classify into `ac_<category>` buckets.
    pub category_collections: bool,
}

impl Default for PoiSyncConfig {
    fn default() -> Self {
        Self {
            search_radius_km: DEFAULT_SEARCH_RADIUS_KM,
            zoom_level: DEFAULT_SEARCH_ZOOM_LEVEL,
            note_format: NoteFormat::default(),
            max_concurrent_detail_fetches: 1,
            category_collections: false,
        }
    }
}

/// Port bundle required by the sync service.
pub struct PoiSyncPorts {
    /// Remote POI service.
    pub source: Arc<dyn PoiSource>,
    /// Vessel position.
    pub position: Arc<dyn PositionProvider>,
    /// Live telemetry feed.
    pub telemetry: Arc<dyn TelemetrySink>,
}

impl PoiSyncPorts {
    /// Build a port bundle.
    pub fn new(
        source: Arc<dyn PoiSource>,
        position: Arc<dyn PositionProvider>,
        telemetry: Arc<dyn TelemetrySink>,
    ) -> Self {
        Self {
            source,
            position,
            telemetry,
        }
    }
}

/// Why a single POI could not be resolved this cycle.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolveError {
    /// The detail request did not produce a usable response.
    #[error("detail request failed: {0}")]
    Transport(PoiSourceError),
    /// The detail response was missing expected fields.
    #[error("detail payload rejected: {0}")]
    Decode(PoiSourceError),
}

impl From<PoiSourceError> for ResolveError {
    fn from(error: PoiSourceError) -> Self {
        if error.is_transport() {
            Self::Transport(error)
        } else {
            Self::Decode(error)
        }
    }
}

/// Where a resolved detail came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailOrigin {
    /// Served from the detail cache.
    Cached,
    /// Fetched and stored in the detail cache.
    Fetched,
    /// Fetched but not stored because the cache is full.
    Uncached,
}

impl From<&CacheLookup> for DetailOrigin {
    fn from(lookup: &CacheLookup) -> Self {
        match lookup {
            CacheLookup::Hit(_) => Self::Cached,
            CacheLookup::Fetched(_) => Self::Fetched,
            CacheLookup::Uncached(_) => Self::Uncached,
        }
    }
}

/// Result of resolving and publishing one POI.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolveOutcome {
    /// Source of the detail.
    pub origin: DetailOrigin,
    /// Buckets written.
    pub buckets: BTreeSet<String>,
    /// Whether the telemetry sink accepted the update.
    pub published: bool,
}

/// Per-cycle counters.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Box that was searched.
    pub bounding_box: BoundingBox,
    /// Summaries returned by the search.
    pub found: usize,
    /// Details served from the cache.
    pub cached: usize,
    /// Details fetched from the remote service.
    pub fetched: usize,
    /// Fetched details left out of a full cache.
    pub uncached: usize,
    /// POIs skipped because their detail could not be resolved.
    pub failed: usize,
    /// Resolved POIs whose telemetry update was rejected.
    pub unpublished: usize,
}

impl CycleReport {
    fn new(bounding_box: BoundingBox, found: usize) -> Self {
        Self {
            bounding_box,
            found,
            cached: 0,
            fetched: 0,
            uncached: 0,
            failed: 0,
            unpublished: 0,
        }
    }

    fn record(&mut self, outcome: &Result<ResolveOutcome, ResolveError>) {
        let Ok(outcome) = outcome else {
            self.failed += 1;
            return;
        };
        match outcome.origin {
            DetailOrigin::Cached => self.cached += 1,
            DetailOrigin::Fetched => self.fetched += 1,
            DetailOrigin::Uncached => self.uncached += 1,
        }
        if !outcome.published {
            self.unpublished += 1;
        }
    }
}

/// How a call to [`PoiSyncService::run_cycle`] ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// No position fix yet; nothing was done.
    NoPosition,
    /// Another cycle was still running; nothing was done.
    Skipped,
    /// The bounding-box search failed; no POI was resolved.
    SearchFailed(PoiSourceError),
    /// Every returned POI was attempted.
    Completed(CycleReport),
}

/// Releases the in-flight flag when a cycle ends, however it ends.
struct CycleGuard<'a>(&'a AtomicBool);

impl<'a> CycleGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Domain-owned POI sync service.
pub struct PoiSyncService {
    source: Arc<dyn PoiSource>,
    position: Arc<dyn PositionProvider>,
    telemetry: Arc<dyn TelemetrySink>,
    state: Arc<PoiState>,
    classifier: ResourceClassifier,
    config: PoiSyncConfig,
    in_flight: AtomicBool,
}

impl PoiSyncService {
    /// Build a service writing into `state`.
    ///
    /// ```rust,ignore
    /// let service = PoiSyncService::new(ports, PoiState::shared(), PoiSyncConfig::default());
    /// ```
    pub fn new(ports: PoiSyncPorts, state: Arc<PoiState>, config: PoiSyncConfig) -> Self {
        Self {
            source: ports.source,
            position: ports.position,
            telemetry: ports.telemetry,
            state,
            classifier: ResourceClassifier::new(config.category_collections),
            config,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Shared state this service fills.
    pub fn state(&self) -> &Arc<PoiState> {
        &self.state
    }

    /// Whether a cycle is currently running.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one synchronisation cycle unless one is already running.
    ///
    /// Never fails: every problem is logged and reflected in the outcome.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_guard) = CycleGuard::try_acquire(&self.in_flight) else {
            warn!("previous POI sync cycle still running; skipping");
            return CycleOutcome::Skipped;
        };

        let cycle_id = Uuid::new_v4();
        self.run_exclusive_cycle()
            .instrument(info_span!("poi_sync_cycle", %cycle_id))
            .await
    }

    async fn run_exclusive_cycle(&self) -> CycleOutcome {
        let Some(position) = self.position.current_position() else {
            info!("no position fix; skipping POI sync cycle");
            return CycleOutcome::NoPosition;
        };

        let bounding_box = compute_bounding_box(position, self.config.search_radius_km);
        let request = PoiSearchRequest {
            bounding_box,
            zoom_level: self.config.zoom_level,
        };
        let summaries = match self.source.search_box(&request).await {
            Ok(summaries) => summaries,
            Err(error) => {
                warn!(%error, "POI search failed; aborting cycle");
                return CycleOutcome::SearchFailed(error);
            }
        };

        let mut report = CycleReport::new(bounding_box, summaries.len());
        let concurrency = self.config.max_concurrent_detail_fetches.max(1);
        let outcomes: Vec<_> = stream::iter(summaries.into_iter().map(|summary| summary.id))
            .map(|id| async move { self.resolve_and_publish(&id).await })
            .buffered(concurrency)
            .collect()
            .await;
        for outcome in &outcomes {
            report.record(outcome);
        }

        info!(
            found = report.found,
            cached = report.cached,
            fetched = report.fetched,
            uncached = report.uncached,
            failed = report.failed,
            unpublished = report.unpublished,
            "POI sync cycle completed"
        );
        CycleOutcome::Completed(report)
    }

    /// Resolve one POI (cache first) then classify and publish it.
    ///
    /// A cached POI is republished without a remote call. Concurrent calls
    /// for an uncached id share a single fetch.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the detail cannot be fetched or decoded;
    /// the id stays uncached so a later cycle retries it.
    pub async fn resolve_and_publish(&self, id: &PoiId) -> Result<ResolveOutcome, ResolveError> {
        let lookup = self
            .state
            .details
            .get_or_resolve(id, || self.fetch_detail(id))
            .await
            .inspect_err(|error| warn!(poi_id = %id, %error, "skipping POI this cycle"))?;
        if matches!(lookup, CacheLookup::Hit(_)) {
            debug!(poi_id = %id, "detail cache hit");
        }

        let detail = lookup.detail();
        let buckets = self.classifier.classify(detail, &self.state.resources);
        let published = self.publish(detail).await;

        Ok(ResolveOutcome {
            origin: DetailOrigin::from(&lookup),
            buckets,
            published,
        })
    }

    async fn fetch_detail(&self, id: &PoiId) -> Result<PoiDetail, ResolveError> {
        let record = self.source.fetch_detail(id).await?;
        Ok(PoiDetail::from_record(
            id.clone(),
            record,
            &self.config.note_format,
        ))
    }

    async fn publish(&self, detail: &PoiDetail) -> bool {
        let update = TelemetryUpdate::for_poi(detail);
        match self.telemetry.publish(&update).await {
            Ok(()) => {
                debug!(poi_id = %detail.id, path = %update.path, "published POI");
                true
            }
            Err(error) => {
                warn!(poi_id = %detail.id, %error, "telemetry publish failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests;
