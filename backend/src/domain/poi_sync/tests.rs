//! Unit tests for POI sync cycle orchestration.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rstest::{fixture, rstest};
use serde_json::json;
use tokio::sync::{Semaphore, mpsc};

use super::{
    CycleOutcome, CycleReport, DetailOrigin, PoiSyncConfig, PoiSyncPorts, PoiSyncSchedule,
    PoiSyncScheduler, PoiSyncService, ResolveError,
};
use crate::domain::geo::Position;
use crate::domain::poi::{PoiDetailRecord, PoiId, PoiSummary};
use crate::domain::ports::{
    FixturePoiSource, FixturePositionProvider, FixtureTelemetrySink, MockPoiSource,
    MockPositionProvider, MockTelemetrySink, PoiSearchRequest, PoiSource, PoiSourceError,
    TelemetrySink, TelemetrySinkError, TelemetryUpdate,
};
use crate::domain::resources::ResourceProjection;
use crate::domain::state::PoiState;

type DetailScript = VecDeque<Result<PoiDetailRecord, PoiSourceError>>;

struct SourceStub {
    search: Result<Vec<PoiSummary>, PoiSourceError>,
    details: Mutex<HashMap<PoiId, DetailScript>>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
    active: AtomicUsize,
    max_active: AtomicUsize,
    entered: Option<mpsc::UnboundedSender<&'static str>>,
    gate: Option<Arc<Semaphore>>,
}

impl SourceStub {
    fn new(ids: &[&str]) -> Self {
        Self {
            search: Ok(ids.iter().map(|id| PoiSummary { id: PoiId::from(*id) }).collect()),
            details: Mutex::default(),
            search_calls: AtomicUsize::new(0),
            detail_calls: AtomicUsize::new(0),
            active: AtomicUsize::new(0),
            max_active: AtomicUsize::new(0),
            entered: None,
            gate: None,
        }
    }

    fn failing_search(error: PoiSourceError) -> Self {
        Self {
            search: Err(error),
            ..Self::new(&[])
        }
    }

    fn gated(
        self,
        entered: mpsc::UnboundedSender<&'static str>,
        gate: Arc<Semaphore>,
    ) -> Self {
        Self {
            entered: Some(entered),
            gate: Some(gate),
            ..self
        }
    }

    fn with_detail(self, id: &str, result: Result<PoiDetailRecord, PoiSourceError>) -> Self {
        self.details
            .lock()
            .expect("details mutex")
            .entry(PoiId::from(id))
            .or_default()
            .push_back(result);
        self
    }

    async fn wait_for_gate(&self, stage: &'static str) {
        if let Some(entered) = &self.entered {
            entered.send(stage).expect("send entry");
        }
        if let Some(gate) = &self.gate {
            gate.acquire().await.expect("gate open").forget();
        }
    }
}

#[async_trait]
impl PoiSource for SourceStub {
    async fn search_box(
        &self,
        _request: &PoiSearchRequest,
    ) -> Result<Vec<PoiSummary>, PoiSourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.wait_for_gate("search").await;
        self.search.clone()
    }

    async fn fetch_detail(&self, id: &PoiId) -> Result<PoiDetailRecord, PoiSourceError> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        let active_now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active_now, Ordering::SeqCst);
        self.wait_for_gate("detail").await;
        tokio::task::yield_now().await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        let mut details = self.details.lock().expect("details mutex");
        let script = details.entry(id.clone()).or_default();
        match script.len() {
            0 => Err(PoiSourceError::decode(format!("unscripted POI {id}"))),
            1 => script.front().cloned().expect("scripted detail"),
            _ => script.pop_front().expect("scripted detail"),
        }
    }
}

#[derive(Default)]
struct RecordingSink {
    updates: Mutex<Vec<TelemetryUpdate>>,
    reject: bool,
}

impl RecordingSink {
    fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    fn paths(&self) -> Vec<String> {
        self.updates
            .lock()
            .expect("updates mutex")
            .iter()
            .map(|update| update.path.clone())
            .collect()
    }
}

#[async_trait]
impl TelemetrySink for RecordingSink {
    async fn publish(&self, update: &TelemetryUpdate) -> Result<(), TelemetrySinkError> {
        if self.reject {
            return Err(TelemetrySinkError::unavailable("no subscribers"));
        }
        self.updates
            .lock()
            .expect("updates mutex")
            .push(update.clone());
        Ok(())
    }
}

fn record(name: &str, category: &str, notes: &[&str]) -> PoiDetailRecord {
    PoiDetailRecord {
        name: name.to_owned(),
        position: Position::new(47.61, -122.31),
        category: category.to_owned(),
        notes: notes.iter().map(|note| (*note).to_owned()).collect(),
        url: format!("https://example.invalid/pois/{name}"),
        raw: json!({ "name": name, "poiType": category }),
    }
}

#[fixture]
fn vessel() -> Position {
    Position::new(47.6, -122.3)
}

#[fixture]
fn config() -> PoiSyncConfig {
    PoiSyncConfig {
        category_collections: true,
        ..PoiSyncConfig::default()
    }
}

struct Harness {
    service: Arc<PoiSyncService>,
    source: Arc<SourceStub>,
    sink: Arc<RecordingSink>,
}

impl Harness {
    fn new(source: SourceStub, position: Option<Position>, config: PoiSyncConfig) -> Self {
        Self::with_state(source, position, config, RecordingSink::default(), PoiState::shared())
    }

    fn with_state(
        source: SourceStub,
        position: Option<Position>,
        config: PoiSyncConfig,
        sink: RecordingSink,
        state: Arc<PoiState>,
    ) -> Self {
        let source = Arc::new(source);
        let sink = Arc::new(sink);
        let ports = PoiSyncPorts::new(
            source.clone(),
            Arc::new(FixturePositionProvider { position }),
            sink.clone(),
        );
        Self {
            service: Arc::new(PoiSyncService::new(ports, state, config)),
            source,
            sink,
        }
    }

    fn detail_calls(&self) -> usize {
        self.source.detail_calls.load(Ordering::SeqCst)
    }
}

fn completed(outcome: CycleOutcome) -> CycleReport {
    match outcome {
        CycleOutcome::Completed(report) => report,
        other => panic!("expected a completed cycle, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn cycle_without_position_does_nothing(config: PoiSyncConfig) {
    let mut position = MockPositionProvider::new();
    position.expect_current_position().times(1).return_const(None::<Position>);
    let source = Arc::new(SourceStub::new(&["A"]));
    let service = PoiSyncService::new(
        PoiSyncPorts::new(
            source.clone(),
            Arc::new(position),
            Arc::new(RecordingSink::default()),
        ),
        PoiState::shared(),
        config,
    );

    assert_eq!(service.run_cycle().await, CycleOutcome::NoPosition);
    assert_eq!(source.search_calls.load(Ordering::SeqCst), 0);
    assert!(!service.is_running());
}

#[rstest]
#[tokio::test]
async fn search_failure_aborts_cycle(vessel: Position, config: PoiSyncConfig) {
    let error = PoiSourceError::rejected(503_u16, "maintenance");
    let harness = Harness::new(SourceStub::failing_search(error.clone()), Some(vessel), config);

    let outcome = harness.service.run_cycle().await;

    assert_eq!(outcome, CycleOutcome::SearchFailed(error));
    assert_eq!(harness.detail_calls(), 0);
    assert!(harness.sink.paths().is_empty());
    assert!(harness.service.state().resources.bucket_names().is_empty());
}

#[rstest]
#[tokio::test]
async fn cycle_publishes_and_classifies_found_pois(vessel: Position, config: PoiSyncConfig) {
    let source = SourceStub::new(&["A"]).with_detail(
        "A",
        Ok(record("Dock X", "Marina", &["Great facilities, friendly staff"])),
    );
    let harness = Harness::new(source, Some(vessel), config);

    let report = completed(harness.service.run_cycle().await);

    assert_eq!((report.found, report.fetched, report.failed), (1, 1, 0));
    assert!(report.bounding_box.north > vessel.latitude);
    assert!(report.bounding_box.south < vessel.latitude);
    assert_eq!(harness.sink.paths(), vec!["pointsOfInterest.activeCaptain.A"]);
    let resources = &harness.service.state().resources;
    assert!(resources.get("notes", "A").is_some());
    assert!(matches!(
        resources.get("ac_Marina", "A"),
        Some(ResourceProjection::Raw(_))
    ));
    assert_eq!(resources.bucket_names(), vec!["ac_Marina", "notes"]);
}

#[rstest]
#[tokio::test]
async fn cached_pois_are_republished_without_fetching(vessel: Position, config: PoiSyncConfig) {
    let source = SourceStub::new(&["A"]).with_detail("A", Ok(record("Dock X", "Marina", &[])));
    let harness = Harness::new(source, Some(vessel), config);

    let first = completed(harness.service.run_cycle().await);
    let second = completed(harness.service.run_cycle().await);

    assert_eq!((first.fetched, first.cached), (1, 0));
    assert_eq!((second.fetched, second.cached), (0, 1));
    assert_eq!(harness.detail_calls(), 1);
    assert_eq!(harness.sink.paths().len(), 2);
}

#[rstest]
#[tokio::test]
async fn resolving_twice_fetches_once(vessel: Position, config: PoiSyncConfig) {
    let source = SourceStub::new(&[]).with_detail("A", Ok(record("Dock X", "Marina", &[])));
    let harness = Harness::new(source, Some(vessel), config);
    let id = PoiId::from("A");

    let first = harness.service.resolve_and_publish(&id).await.expect("first");
    let second = harness.service.resolve_and_publish(&id).await.expect("second");

    assert_eq!(first.origin, DetailOrigin::Fetched);
    assert_eq!(second.origin, DetailOrigin::Cached);
    assert_eq!(first.buckets, second.buckets);
    assert_eq!(harness.detail_calls(), 1);
    assert_eq!(harness.sink.paths().len(), 2);
}

#[rstest]
#[tokio::test]
async fn failed_details_are_skipped_and_retried_next_cycle(
    vessel: Position,
    config: PoiSyncConfig,
) {
    let source = SourceStub::new(&["A", "B"])
        .with_detail("A", Err(PoiSourceError::timeout("30s elapsed")))
        .with_detail("A", Ok(record("Dock X", "Marina", &[])))
        .with_detail("B", Ok(record("Cove", "Anchorage", &[])));
    let harness = Harness::new(source, Some(vessel), config);

    let first = completed(harness.service.run_cycle().await);
    assert_eq!((first.fetched, first.failed), (1, 1));
    assert!(harness.service.state().details.get(&PoiId::from("A")).is_none());
    assert!(harness.service.state().resources.get("notes", "A").is_none());

    let second = completed(harness.service.run_cycle().await);
    assert_eq!((second.fetched, second.cached, second.failed), (1, 1, 0));
    assert!(harness.service.state().resources.get("notes", "A").is_some());
}

#[rstest]
#[case::transport(PoiSourceError::transport("connection reset"), true)]
#[case::decode(PoiSourceError::decode("missing pointOfInterest"), false)]
#[tokio::test]
async fn resolve_errors_keep_their_kind(
    vessel: Position,
    config: PoiSyncConfig,
    #[case] error: PoiSourceError,
    #[case] is_transport: bool,
) {
    let harness = Harness::new(
        SourceStub::new(&[]).with_detail("A", Err(error.clone())),
        Some(vessel),
        config,
    );

    let result = harness.service.resolve_and_publish(&PoiId::from("A")).await;

    let expected = if is_transport {
        ResolveError::Transport(error)
    } else {
        ResolveError::Decode(error)
    };
    assert_eq!(result, Err(expected));
    assert!(harness.sink.paths().is_empty());
}

#[rstest]
#[tokio::test]
async fn rejected_telemetry_does_not_block_classification(
    vessel: Position,
    config: PoiSyncConfig,
) {
    let harness = Harness::with_state(
        SourceStub::new(&["A"]).with_detail("A", Ok(record("Dock X", "Marina", &[]))),
        Some(vessel),
        config,
        RecordingSink::rejecting(),
        PoiState::shared(),
    );

    let report = completed(harness.service.run_cycle().await);

    assert_eq!((report.fetched, report.unpublished), (1, 1));
    assert!(harness.service.state().resources.get("notes", "A").is_some());
}

#[rstest]
#[tokio::test]
async fn full_cache_still_publishes(vessel: Position, config: PoiSyncConfig) {
    let harness = Harness::with_state(
        SourceStub::new(&["A"]).with_detail("A", Ok(record("Dock X", "Marina", &[]))),
        Some(vessel),
        config,
        RecordingSink::default(),
        PoiState::with_cache_capacity(Some(0)),
    );

    let first = completed(harness.service.run_cycle().await);
    let second = completed(harness.service.run_cycle().await);

    assert_eq!((first.uncached, second.uncached), (1, 1));
    assert_eq!(harness.detail_calls(), 2);
    assert_eq!(harness.sink.paths().len(), 2);
    assert!(harness.service.state().details.is_empty());
}

#[rstest]
#[case::sequential(1, 1)]
#[case::bounded(2, 2)]
#[tokio::test]
async fn detail_fetches_respect_concurrency_limit(
    vessel: Position,
    #[case] limit: usize,
    #[case] expected_peak: usize,
) {
    let ids = ["A", "B", "C", "D"];
    let source = ids.iter().fold(SourceStub::new(&ids), |source, id| {
        source.with_detail(id, Ok(record(id, "Hazard", &[])))
    });
    let config = PoiSyncConfig {
        max_concurrent_detail_fetches: limit,
        ..PoiSyncConfig::default()
    };
    let harness = Harness::new(source, Some(vessel), config);

    let report = completed(harness.service.run_cycle().await);

    assert_eq!(report.fetched, ids.len());
    assert_eq!(harness.source.max_active.load(Ordering::SeqCst), expected_peak);
}

#[rstest]
#[tokio::test]
async fn overlapping_cycle_is_skipped(vessel: Position, config: PoiSyncConfig) {
    let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
    let gate = Arc::new(Semaphore::new(0));
    let harness = Harness::new(
        SourceStub::new(&[]).gated(entered_tx, gate.clone()),
        Some(vessel),
        config,
    );

    let (first, second) = tokio::join!(harness.service.run_cycle(), async {
        entered_rx.recv().await.expect("search entered");
        assert!(harness.service.is_running());
        let second = harness.service.run_cycle().await;
        gate.add_permits(1);
        second
    });

    assert_eq!(second, CycleOutcome::Skipped);
    assert_eq!(completed(first).found, 0);
    assert_eq!(harness.source.search_calls.load(Ordering::SeqCst), 1);
    assert!(!harness.service.is_running());
}

#[rstest]
#[tokio::test]
async fn concurrent_cycles_sharing_state_fetch_each_id_once(
    vessel: Position,
    config: PoiSyncConfig,
) {
    let (entered_tx, mut entered_rx) = mpsc::unbounded_channel();
    let gate = Arc::new(Semaphore::new(0));
    let source = Arc::new(
        SourceStub::new(&["A"])
            .with_detail("A", Ok(record("Dock X", "Marina", &[])))
            .gated(entered_tx, gate.clone()),
    );
    let state = PoiState::shared();
    let build = || {
        PoiSyncService::new(
            PoiSyncPorts::new(
                source.clone(),
                Arc::new(FixturePositionProvider::at(vessel)),
                Arc::new(RecordingSink::default()),
            ),
            state.clone(),
            config.clone(),
        )
    };
    let (left, right) = (build(), build());

    let (first, second, ()) = tokio::join!(left.run_cycle(), right.run_cycle(), async {
        while let Some(stage) = entered_rx.recv().await {
            if stage == "detail" {
                break;
            }
            gate.add_permits(1);
        }
        // Let the second resolver reach the shared slot before releasing.
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        gate.add_permits(1);
    });

    let (first, second) = (completed(first), completed(second));
    assert_eq!(first.fetched + second.fetched, 1);
    assert_eq!(first.cached + second.cached, 1);
    assert_eq!(source.detail_calls.load(Ordering::SeqCst), 1);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn scheduler_runs_after_delay_then_on_interval(vessel: Position, config: PoiSyncConfig) {
    let harness = Harness::new(SourceStub::new(&[]), Some(vessel), config);
    let handle = PoiSyncScheduler::new(
        harness.service.clone(),
        PoiSyncSchedule {
            startup_delay: Duration::from_secs(15),
            interval: Duration::from_secs(900),
        },
    )
    .spawn();
    let searches = || harness.source.search_calls.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_secs(14)).await;
    assert_eq!(searches(), 0);

    tokio::time::sleep(Duration::from_secs(2)).await;
    assert_eq!(searches(), 1);

    tokio::time::sleep(Duration::from_secs(900)).await;
    assert_eq!(searches(), 2);

    assert!(handle.is_running());
    handle.shutdown().await;

    tokio::time::sleep(Duration::from_secs(1800)).await;
    assert_eq!(searches(), 2);
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn zero_interval_is_raised_to_the_minimum(vessel: Position, config: PoiSyncConfig) {
    let harness = Harness::new(SourceStub::new(&[]), Some(vessel), config);
    let handle = PoiSyncScheduler::new(
        harness.service.clone(),
        PoiSyncSchedule {
            startup_delay: Duration::from_secs(1),
            interval: Duration::ZERO,
        },
    )
    .spawn();

    tokio::time::sleep(Duration::from_millis(3500)).await;

    assert!(handle.is_running());
    assert!(harness.source.search_calls.load(Ordering::SeqCst) >= 2);
    handle.shutdown().await;
}

#[rstest]
#[tokio::test(start_paused = true)]
async fn scheduler_stopped_during_delay_never_runs(vessel: Position, config: PoiSyncConfig) {
    let harness = Harness::new(SourceStub::new(&[]), Some(vessel), config);
    let handle =
        PoiSyncScheduler::new(harness.service.clone(), PoiSyncSchedule::default()).spawn();

    tokio::time::sleep(Duration::from_secs(5)).await;
    handle.shutdown().await;
    tokio::time::sleep(Duration::from_secs(3600)).await;

    assert_eq!(harness.source.search_calls.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn empty_search_completes_without_side_effects(vessel: Position, config: PoiSyncConfig) {
    let service = PoiSyncService::new(
        PoiSyncPorts::new(
            Arc::new(FixturePoiSource),
            Arc::new(FixturePositionProvider::at(vessel)),
            Arc::new(FixtureTelemetrySink),
        ),
        PoiState::shared(),
        config,
    );

    let report = completed(service.run_cycle().await);

    assert_eq!((report.found, report.fetched, report.failed), (0, 0, 0));
    assert!(service.state().details.is_empty());
}

#[rstest]
#[tokio::test]
async fn each_resolved_poi_is_published_once(vessel: Position, config: PoiSyncConfig) {
    let mut source = MockPoiSource::new();
    source
        .expect_search_box()
        .times(1)
        .returning(|_| Ok(vec![PoiSummary { id: PoiId::from("A") }]));
    source
        .expect_fetch_detail()
        .times(1)
        .returning(|_| Ok(record("Dock X", "Marina", &["Fuel"])));
    let mut telemetry = MockTelemetrySink::new();
    telemetry
        .expect_publish()
        .withf(|update| update.path == "pointsOfInterest.activeCaptain.A")
        .times(1)
        .returning(|_| Ok(()));
    let service = PoiSyncService::new(
        PoiSyncPorts::new(
            Arc::new(source),
            Arc::new(FixturePositionProvider::at(vessel)),
            Arc::new(telemetry),
        ),
        PoiState::shared(),
        config,
    );

    let report = completed(service.run_cycle().await);

    assert_eq!(report.fetched, 1);
    assert_eq!(report.unpublished, 0);
}
