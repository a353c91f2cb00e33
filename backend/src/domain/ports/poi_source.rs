//! Driven port for the remote points-of-interest service.
//!
//! The domain owns the request shape and the decoded detail record so the
//! sync cycle stays independent of the HTTP adapter.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::geo::BoundingBox;
use crate::domain::poi::{PoiDetailRecord, PoiId, PoiSummary};

/// Zoom granularity requested from the search endpoint.
pub const DEFAULT_SEARCH_ZOOM_LEVEL: u8 = 17;

/// Bounding-box search issued once per cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiSearchRequest {
    /// Region to search.
    pub bounding_box: BoundingBox,
    /// Remote zoom granularity.
    pub zoom_level: u8,
}

define_port_error! {
    /// Errors surfaced while calling the POI service.
    pub enum PoiSourceError {
        /// Network transport failed before a response arrived.
        Transport { message: String } =>
            "poi service transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } =>
            "poi service timeout: {message}",
        /// The service answered with a non-success status.
        Rejected { status: u16, message: String } =>
            "poi service rejected request with status {status}: {message}",
        /// The response was successful but missing or malformed.
        Decode { message: String } =>
            "poi service response decode failed: {message}",
    }
}

impl PoiSourceError {
    /// Return whether the failure happened before a usable response arrived.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::Rejected { .. }
        )
    }
}

/// Port for searching and resolving POIs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PoiSource: Send + Sync {
    /// Find POIs inside a bounding box. An absent result list is empty.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use poi_sync::domain::geo::BoundingBox;
    /// use poi_sync::domain::ports::{FixturePoiSource, PoiSearchRequest, PoiSource};
    ///
    /// let source = FixturePoiSource;
    /// let summaries = source
    ///     .search_box(&PoiSearchRequest {
    ///         bounding_box: BoundingBox { north: 48.0, south: 47.0, east: -121.0, west: -123.0 },
    ///         zoom_level: 17,
    ///     })
    ///     .await?;
    /// assert!(summaries.is_empty());
    /// # Ok::<(), poi_sync::domain::ports::PoiSourceError>(())
    /// ```
    async fn search_box(
        &self,
        request: &PoiSearchRequest,
    ) -> Result<Vec<PoiSummary>, PoiSourceError>;

    /// Fetch and decode the full record for one POI.
    async fn fetch_detail(&self, id: &PoiId) -> Result<PoiDetailRecord, PoiSourceError>;
}

/// Fixture implementation with no POIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixturePoiSource;

#[async_trait]
impl PoiSource for FixturePoiSource {
    async fn search_box(
        &self,
        _request: &PoiSearchRequest,
    ) -> Result<Vec<PoiSummary>, PoiSourceError> {
        Ok(Vec::new())
    }

    async fn fetch_detail(&self, id: &PoiId) -> Result<PoiDetailRecord, PoiSourceError> {
        Err(PoiSourceError::decode(format!(
            "fixture source has no details for {id}"
        )))
    }
}
