//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module mirrors their shape for utoipa's external schema registration.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The collection or entry does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The collection is read-only.
    #[schema(rename = "unsupported_operation")]
    UnsupportedOperation,
    /// A dependency is temporarily unavailable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "resource 42 not found in notes")]
    message: String,
    /// Supplementary error details for clients.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Position`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Position)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PositionSchema {
    /// Latitude in degrees north.
    #[schema(example = 47.6)]
    latitude: f64,
    /// Longitude in degrees east.
    #[schema(example = -122.3)]
    longitude: f64,
}

/// OpenAPI schema for [`crate::domain::NoteResource`].
#[derive(ToSchema)]
#[schema(as = crate::domain::NoteResource)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NoteResourceSchema {
    /// POI display name.
    #[schema(example = "Dock X")]
    name: String,
    /// Every note, numbered.
    #[schema(example = "1. Great facilities")]
    description: String,
    /// POI location.
    position: PositionSchema,
    /// Raw remote category.
    #[schema(example = "Marina")]
    group: String,
    /// Public page for the POI.
    #[schema(example = "https://activecaptain.garmin.com/en-US/pois/12345")]
    url: String,
}
