//! Domain primitives, state and services for POI synchronisation.
//!
//! Purpose: keep the sync engine independent of transports. Adapters reach
//! the outside world through [`ports`]; everything here is pure data,
//! in-memory state, or orchestration over those ports.
//!
//! Public surface:
//! - Error / ErrorCode: façade error payload and stable code.
//! - PoiSyncService: one sync cycle; PoiSyncScheduler drives it on a timer.
//! - PoiState: detail cache plus resource buckets shared with the façade.
//! - ResourceRegistry: table of registered read-only collections.

pub mod category;
pub mod classifier;
pub mod detail_cache;
pub mod error;
pub mod geo;
pub mod notes;
pub mod poi;
pub mod poi_sync;
pub mod ports;
pub mod resource_registry;
pub mod resources;
pub mod state;

pub use self::category::{KnownCategory, NOTES_COLLECTION, category_collection_name};
pub use self::classifier::ResourceClassifier;
pub use self::detail_cache::{CacheLookup, DetailCache};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geo::{BoundingBox, Position, compute_bounding_box, destination};
pub use self::notes::NoteFormat;
pub use self::poi::{PoiDetail, PoiDetailRecord, PoiId, PoiSummary};
pub use self::poi_sync::{
    CycleOutcome, CycleReport, DEFAULT_SEARCH_RADIUS_KM, DetailOrigin, PoiSyncConfig,
    PoiSyncPorts, PoiSyncSchedule, PoiSyncScheduler, PoiSyncService, ResolveError,
    ResolveOutcome, SchedulerHandle,
};
pub use self::resource_registry::{
    BucketResourceProvider, RegistrationToggles, ResourceRegistry,
};
pub use self::resources::{NoteResource, ResourceProjection, ResourceStore};
pub use self::state::PoiState;

/// Convenient result alias for façade operations.
///
/// # Examples
/// ```
/// use poi_sync::domain::{ApiResult, Error};
///
/// fn lookup(id: &str) -> ApiResult<()> {
///     Err(Error::not_found(format!("resource {id} not found in notes")))
/// }
/// assert!(lookup("42").is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
