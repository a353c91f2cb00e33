//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `POI_SYNC_*` environment variables or a
//! config file. Every field is optional; accessors fall back to the
//! defaults below.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::notes::{DEFAULT_SHORT_NOTE_LIMIT, NoteFormat};
use crate::domain::ports::DEFAULT_SEARCH_ZOOM_LEVEL;
use crate::domain::{
    DEFAULT_SEARCH_RADIUS_KM, PoiSyncConfig, PoiSyncSchedule, Position, RegistrationToggles,
};
use crate::outbound::active_captain::{
    ActiveCaptainIdentity, DEFAULT_API_BASE_URL, DEFAULT_POI_PAGE_BASE_URL, DEFAULT_USER_AGENT,
};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_STARTUP_DELAY_SECS: u64 = 15;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 15 * 60;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_CONCURRENT_DETAIL_FETCHES: usize = 1;

/// Configuration values for the sync service.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "POI_SYNC")]
pub struct PoiSyncSettings {
    /// Register the generic `notes` collection.
    pub note_resources: Option<bool>,
    /// Register one `ac_<Category>` collection per known category.
    pub category_resources: Option<bool>,
    /// HTTP listen address.
    pub bind_addr: Option<SocketAddr>,
    /// Points-of-interest API root.
    pub api_base_url: Option<String>,
    /// Root of public POI pages.
    pub poi_page_base_url: Option<String>,
    /// User agent sent with every remote request.
    pub user_agent: Option<String>,
    /// Distance from the vessel to each search box corner, in kilometres.
    pub search_radius_km: Option<f64>,
    /// Zoom level sent with each search.
    pub zoom_level: Option<u8>,
    /// Seconds before the first cycle.
    pub startup_delay_secs: Option<u64>,
    /// Seconds between cycles; zero is raised to one.
    pub poll_interval_secs: Option<u64>,
    /// Per-request timeout, in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Character cap for the telemetry note.
    pub short_note_limit: Option<usize>,
    /// Detail requests allowed in flight within one cycle.
    pub max_concurrent_detail_fetches: Option<usize>,
    /// Maximum cached details; unbounded when unset.
    pub detail_cache_capacity: Option<usize>,
    /// Seed latitude used until the first fix is pushed.
    pub initial_latitude: Option<f64>,
    /// Seed longitude used until the first fix is pushed.
    pub initial_longitude: Option<f64>,
}

impl PoiSyncSettings {
    /// Which resource collections to register.
    pub fn toggles(&self) -> RegistrationToggles {
        let defaults = RegistrationToggles::default();
        RegistrationToggles {
            note_resources: self.note_resources.unwrap_or(defaults.note_resources),
            category_resources: self
                .category_resources
                .unwrap_or(defaults.category_resources),
        }
    }

    /// Listen address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)))
    }

    /// Remote API root.
    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE_URL)
    }

    /// Outbound identity for remote requests.
    pub fn identity(&self) -> ActiveCaptainIdentity {
        ActiveCaptainIdentity {
            user_agent: self
                .user_agent
                .clone()
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_owned()),
            poi_page_base_url: self
                .poi_page_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_POI_PAGE_BASE_URL.to_owned()),
        }
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Cycle timing.
    pub fn schedule(&self) -> PoiSyncSchedule {
        PoiSyncSchedule {
            startup_delay: Duration::from_secs(
                self.startup_delay_secs
                    .unwrap_or(DEFAULT_STARTUP_DELAY_SECS),
            ),
            interval: Duration::from_secs(
                self.poll_interval_secs
                    .unwrap_or(DEFAULT_POLL_INTERVAL_SECS)
                    .max(1),
            ),
        }
    }

    /// Cycle behaviour.
    pub fn sync_config(&self) -> PoiSyncConfig {
        PoiSyncConfig {
            search_radius_km: self.search_radius_km.unwrap_or(DEFAULT_SEARCH_RADIUS_KM),
            zoom_level: self.zoom_level.unwrap_or(DEFAULT_SEARCH_ZOOM_LEVEL),
            note_format: NoteFormat {
                short_note_limit: self.short_note_limit.unwrap_or(DEFAULT_SHORT_NOTE_LIMIT),
            },
            max_concurrent_detail_fetches: self
                .max_concurrent_detail_fetches
                .unwrap_or(DEFAULT_MAX_CONCURRENT_DETAIL_FETCHES)
                .max(1),
            category_collections: self.toggles().category_resources,
        }
    }

    /// Seed fix, present only when both coordinates are configured.
    pub fn initial_position(&self) -> Option<Position> {
        match (self.initial_latitude, self.initial_longitude) {
            (Some(latitude), Some(longitude)) => Some(Position::new(latitude, longitude)),
            _ => None,
        }
    }
}
