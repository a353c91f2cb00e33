//! Service entry-point: loads settings, starts the sync scheduler and serves
//! the resource façade, position ingestion and telemetry stream.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use poi_sync::PoiSyncSettings;
use poi_sync::domain::PoiSyncScheduler;
use poi_sync::inbound::http::health::HealthState;

use server::{ServerConfig, build_runtime, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PoiSyncSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let runtime = build_runtime(&settings)?;

    info!(
        collections = ?runtime.http_state.resources.collections(),
        "resource collections registered"
    );
    let scheduler = PoiSyncScheduler::new(runtime.service.clone(), settings.schedule()).spawn();

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::from_settings(&settings);
    let server = create_server(health_state.clone(), &runtime, config)?;
    info!(bind_addr = %config.bind_addr(), "HTTP server listening");

    let result = server.await;

    health_state.mark_unhealthy();
    scheduler.shutdown().await;
    info!("POI sync stopped");
    result
}
