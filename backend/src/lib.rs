//! Vessel-centred ActiveCaptain POI synchronisation.
//!
//! The [`domain`] module holds the sync cycle, detail cache and resource
//! buckets behind port traits; [`outbound`] and [`inbound`] adapt those ports
//! to reqwest, tokio channels, actix-web and WebSockets.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by tooling.
pub use doc::ApiDoc;
pub use settings::PoiSyncSettings;
