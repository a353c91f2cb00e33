//! Driven port for the live POI telemetry feed.
//!
//! Each resolved POI is published under
//! `pointsOfInterest.activeCaptain.<poiId>`. Publishing is at-least-once:
//! cached POIs are republished on every cycle that finds them.

use async_trait::async_trait;
use serde::Serialize;

use super::define_port_error;
use crate::domain::geo::Position;
use crate::domain::poi::PoiDetail;

/// Path prefix for POI telemetry values.
pub const POI_TELEMETRY_PREFIX: &str = "pointsOfInterest.activeCaptain";

/// Value published for one POI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiTelemetryValue {
    /// Display name.
    pub name: String,
    /// Map location.
    pub position: Position,
    /// Raw remote category.
    #[serde(rename = "type")]
    pub category: String,
    /// Short note.
    pub notes: String,
    /// Public page for the POI.
    pub url: String,
}

/// One telemetry update: a path and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryUpdate {
    /// Dotted telemetry path.
    pub path: String,
    /// Published value.
    pub value: PoiTelemetryValue,
}

impl TelemetryUpdate {
    /// Build the update published for a resolved POI.
    ///
    /// ```rust,ignore
    /// let update = TelemetryUpdate::for_poi(&detail);
    /// assert_eq!(update.path, "pointsOfInterest.activeCaptain.A");
    /// ```
    pub fn for_poi(detail: &PoiDetail) -> Self {
        Self {
            path: format!("{POI_TELEMETRY_PREFIX}.{}", detail.id),
            value: PoiTelemetryValue {
                name: detail.name.clone(),
                position: detail.position,
                category: detail.category.clone(),
                notes: detail.short_note.clone(),
                url: detail.url.clone(),
            },
        }
    }
}

define_port_error! {
    /// Errors surfaced by telemetry sinks.
    pub enum TelemetrySinkError {
        /// The sink can no longer accept updates.
        Unavailable { message: String } => "telemetry sink unavailable: {message}",
    }
}

/// Port for publishing POI telemetry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Publish one update.
    async fn publish(&self, update: &TelemetryUpdate) -> Result<(), TelemetrySinkError>;
}

/// Fixture implementation discarding every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixtureTelemetrySink;

#[async_trait]
impl TelemetrySink for FixtureTelemetrySink {
    async fn publish(&self, _update: &TelemetryUpdate) -> Result<(), TelemetrySinkError> {
        Ok(())
    }
}
