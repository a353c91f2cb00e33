//! Builders wiring adapters into the sync service and the inbound states.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use url::Url;

use poi_sync::PoiSyncSettings;
use poi_sync::domain::{PoiState, PoiSyncPorts, PoiSyncService, ResourceRegistry};
use poi_sync::inbound::http::state::HttpState;
use poi_sync::inbound::ws::state::WsState;
use poi_sync::outbound::active_captain::ActiveCaptainHttpSource;
use poi_sync::outbound::position::InMemoryPositionProvider;
use poi_sync::outbound::telemetry::{BroadcastTelemetrySink, DEFAULT_TELEMETRY_CAPACITY};

/// Everything the binary needs once settings are loaded.
pub struct Runtime {
    pub http_state: HttpState,
    pub ws_state: WsState,
    pub service: Arc<PoiSyncService>,
}

/// Build shared state, adapters and the sync service from `settings`.
///
/// # Errors
///
/// Returns [`io::Error`] when the API base URL is invalid or the HTTP
/// client cannot be constructed.
pub fn build_runtime(settings: &PoiSyncSettings) -> io::Result<Runtime> {
    let state = PoiState::with_cache_capacity(settings.detail_cache_capacity);

    let base_url = Url::parse(settings.api_base_url()).map_err(|error| {
        io::Error::other(format!(
            "invalid API base URL {}: {error}",
            settings.api_base_url()
        ))
    })?;
    let source = ActiveCaptainHttpSource::with_identity(
        base_url,
        settings.request_timeout(),
        settings.identity(),
    )
    .map_err(|error| io::Error::other(format!("HTTP client construction failed: {error}")))?;

    let positions = Arc::new(InMemoryPositionProvider::new(settings.initial_position()));
    let telemetry = BroadcastTelemetrySink::new(DEFAULT_TELEMETRY_CAPACITY, Arc::new(DefaultClock));

    let service = Arc::new(PoiSyncService::new(
        PoiSyncPorts::new(
            Arc::new(source),
            positions.clone(),
            Arc::new(telemetry.clone()),
        ),
        Arc::clone(&state),
        settings.sync_config(),
    ));

    let registry = ResourceRegistry::from_toggles(settings.toggles(), &state);
    let http_state = HttpState::new(Arc::new(registry), positions.clone(), positions);

    Ok(Runtime {
        http_state,
        ws_state: WsState::new(telemetry),
        service,
    })
}
