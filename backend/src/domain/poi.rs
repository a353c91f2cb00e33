//! Point-of-interest records as seen by the sync cycle.
//!
//! A [`PoiSummary`] only lives for one search; a resolved [`PoiDetail`] is
//! cached for the process lifetime and treated as immutable.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::geo::Position;
use super::notes::NoteFormat;

/// Opaque identifier assigned by the remote POI service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PoiId(String);

impl PoiId {
    /// Wrap a raw identifier.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PoiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PoiId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Identity returned by a bounding-box search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoiSummary {
    /// POI identifier used to fetch details.
    pub id: PoiId,
}

/// Detail payload as decoded from the remote service, before derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDetailRecord {
    /// Display name.
    pub name: String,
    /// Map location.
    pub position: Position,
    /// Raw category from the remote taxonomy, verbatim.
    pub category: String,
    /// Note texts in remote order.
    pub notes: Vec<String>,
    /// Public page for the POI.
    pub url: String,
    /// Undecoded `pointOfInterest` object, kept for category collections.
    pub raw: Value,
}

/// Fully resolved POI held in the detail cache.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiDetail {
    /// POI identifier.
    pub id: PoiId,
    /// Display name.
    pub name: String,
    /// Map location.
    pub position: Position,
    /// Raw category from the remote taxonomy.
    pub category: String,
    /// Note texts in remote order.
    pub notes: Vec<String>,
    /// First note, length capped, for telemetry.
    pub short_note: String,
    /// All notes numbered, for the `notes` collection.
    pub long_note: String,
    /// Public page for the POI.
    pub url: String,
    /// Undecoded remote payload.
    pub raw: Value,
}

impl PoiDetail {
    /// Derive the cached record from a decoded payload.
    ///
    /// ```
    /// use poi_sync::domain::{NoteFormat, PoiDetail, PoiDetailRecord, PoiId, Position};
    ///
    /// let record = PoiDetailRecord {
    ///     name: "Dock X".to_owned(),
    ///     position: Position::new(47.6, -122.3),
    ///     category: "Marina".to_owned(),
    ///     notes: vec!["Fuel and pump-out".to_owned()],
    ///     url: "https://example.invalid/pois/A".to_owned(),
    ///     raw: serde_json::json!({}),
    /// };
    /// let detail = PoiDetail::from_record(PoiId::from("A"), record, &NoteFormat::default());
    /// assert_eq!(detail.short_note, "Fuel and pump-out");
    /// assert_eq!(detail.long_note, "1. Fuel and pump-out");
    /// ```
    pub fn from_record(id: PoiId, record: PoiDetailRecord, format: &NoteFormat) -> Self {
        let short_note = format.short_note(&record.notes);
        let long_note = format.long_note(&record.notes);
        Self {
            id,
            name: record.name,
            position: record.position,
            category: record.category,
            notes: record.notes,
            short_note,
            long_note,
            url: record.url,
            raw: record.raw,
        }
    }
}
