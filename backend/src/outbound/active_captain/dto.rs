//! DTOs for decoding ActiveCaptain JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! records (`PoiSummary`, `PoiDetailRecord`) in one pass.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::category::KnownCategory;
use crate::domain::geo::{BoundingBox, Position};
use crate::domain::poi::{PoiDetailRecord, PoiId, PoiSummary};

/// Body of the bounding-box search.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchBoxRequestDto {
    pub(super) north: f64,
    pub(super) west: f64,
    pub(super) south: f64,
    pub(super) east: f64,
    pub(super) zoom_level: u8,
}

impl SearchBoxRequestDto {
    pub(super) fn new(bounding_box: &BoundingBox, zoom_level: u8) -> Self {
        Self {
            north: bounding_box.north,
            west: bounding_box.west,
            south: bounding_box.south,
            east: bounding_box.east,
            zoom_level,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SearchBoxResponseDto {
    #[serde(default)]
    pub(super) points_of_interest: Option<Vec<PoiSummaryDto>>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PoiSummaryDto {
    pub(super) id: RemoteIdDto,
}

/// Identifiers arrive as JSON numbers but are opaque to the domain.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum RemoteIdDto {
    Number(i64),
    Text(String),
}

impl RemoteIdDto {
    fn into_poi_id(self) -> PoiId {
        match self {
            Self::Number(value) => PoiId::new(value.to_string()),
            Self::Text(value) => PoiId::new(value),
        }
    }
}

impl SearchBoxResponseDto {
    pub(super) fn into_domain_summaries(self) -> Vec<PoiSummary> {
        self.points_of_interest
            .unwrap_or_default()
            .into_iter()
            .map(|summary| PoiSummary {
                id: summary.id.into_poi_id(),
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct DetailResponseDto {
    #[serde(default)]
    pub(super) point_of_interest: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PointOfInterestDto {
    name: Option<String>,
    map_location: Option<MapLocationDto>,
    poi_type: Option<String>,
    #[serde(default)]
    notes: Vec<NoteDto>,
}

#[derive(Debug, Deserialize)]
struct MapLocationDto {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Deserialize)]
struct NoteDto {
    #[serde(default)]
    value: Option<String>,
}

impl DetailResponseDto {
    /// Map the `pointOfInterest` object into a domain record. The raw object
    /// is kept alongside the decoded fields.
    pub(super) fn into_domain_record(
        self,
        id: &PoiId,
        poi_page_base: &str,
    ) -> Result<PoiDetailRecord, String> {
        let raw = self
            .point_of_interest
            .ok_or_else(|| format!("response for POI {id} has no pointOfInterest"))?;
        let decoded: PointOfInterestDto = serde_json::from_value(raw.clone())
            .map_err(|error| format!("pointOfInterest for POI {id} is malformed: {error}"))?;

        let name = decoded
            .name
            .ok_or_else(|| format!("pointOfInterest for POI {id} has no name"))?;
        let location = decoded
            .map_location
            .ok_or_else(|| format!("pointOfInterest for POI {id} has no mapLocation"))?;
        let position = Position::new(location.latitude, location.longitude);
        if !position.is_valid() {
            return Err(format!(
                "pointOfInterest for POI {id} has out-of-range mapLocation"
            ));
        }

        Ok(PoiDetailRecord {
            name,
            position,
            category: decoded
                .poi_type
                .unwrap_or_else(|| KnownCategory::Unknown.as_str().to_owned()),
            notes: decoded
                .notes
                .into_iter()
                .filter_map(|note| note.value)
                .collect(),
            url: format!("{poi_page_base}{id}"),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PAGE_BASE: &str = "https://activecaptain.garmin.com/en-US/pois/";

    fn decode_detail(body: Value) -> Result<PoiDetailRecord, String> {
        let dto: DetailResponseDto = serde_json::from_value(body).expect("detail envelope");
        dto.into_domain_record(&PoiId::from("A"), PAGE_BASE)
    }

    #[test]
    fn search_body_uses_camel_case_zoom() {
        let body = SearchBoxRequestDto::new(
            &BoundingBox {
                north: 48.0,
                south: 47.0,
                east: -121.0,
                west: -123.0,
            },
            17,
        );
        assert_eq!(
            serde_json::to_value(body).expect("serialise body"),
            json!({ "north": 48.0, "west": -123.0, "south": 47.0, "east": -121.0, "zoomLevel": 17 })
        );
    }

    #[test]
    fn summaries_accept_numeric_and_text_ids() {
        let dto: SearchBoxResponseDto = serde_json::from_value(json!({
            "pointsOfInterest": [{ "id": 12345, "name": "ignored" }, { "id": "B" }]
        }))
        .expect("summary envelope");

        let ids: Vec<_> = dto
            .into_domain_summaries()
            .into_iter()
            .map(|summary| summary.id)
            .collect();
        assert_eq!(ids, vec![PoiId::from("12345"), PoiId::from("B")]);
    }

    #[test]
    fn missing_summary_list_means_no_results() {
        let dto: SearchBoxResponseDto =
            serde_json::from_value(json!({})).expect("summary envelope");
        assert!(dto.into_domain_summaries().is_empty());
    }

    #[test]
    fn decodes_detail_and_keeps_raw_payload() {
        let poi = json!({
            "name": "Dock X",
            "mapLocation": { "latitude": 47.61, "longitude": -122.31 },
            "poiType": "Marina",
            "notes": [{ "value": "Great facilities" }, { "value": "Fuel dock" }]
        });

        let record = decode_detail(json!({ "pointOfInterest": poi.clone() })).expect("decode");

        assert_eq!(record.name, "Dock X");
        assert_eq!(record.category, "Marina");
        assert_eq!(record.notes, vec!["Great facilities", "Fuel dock"]);
        assert_eq!(record.url, format!("{PAGE_BASE}A"));
        assert_eq!(record.raw, poi);
    }

    #[test]
    fn missing_poi_type_is_unknown() {
        let record = decode_detail(json!({
            "pointOfInterest": {
                "name": "Rock",
                "mapLocation": { "latitude": 47.0, "longitude": -122.0 }
            }
        }))
        .expect("decode");

        assert_eq!(record.category, "Unknown");
        assert!(record.notes.is_empty());
    }

    #[test]
    fn rejects_incomplete_details() {
        for body in [
            json!({}),
            json!({ "pointOfInterest": { "mapLocation": { "latitude": 47.0, "longitude": -122.0 } } }),
            json!({ "pointOfInterest": { "name": "No location" } }),
            json!({ "pointOfInterest": { "name": "Bad", "mapLocation": { "latitude": 91.0, "longitude": 0.0 } } }),
        ] {
            assert!(decode_detail(body).is_err());
        }
    }
}
