//! Navigation position HTTP handlers.
//!
//! ```text
//! GET /api/v1/navigation/position
//! PUT /api/v1/navigation/position
//! ```

use actix_web::{HttpResponse, get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::geo::Position;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Position payload in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct PositionPayload {
    /// Latitude in degrees north.
    #[schema(example = 47.6)]
    pub latitude: f64,
    /// Longitude in degrees east.
    #[schema(example = -122.3)]
    pub longitude: f64,
}

impl From<PositionPayload> for Position {
    fn from(value: PositionPayload) -> Self {
        Position::new(value.latitude, value.longitude)
    }
}

impl From<Position> for PositionPayload {
    fn from(value: Position) -> Self {
        Self {
            latitude: value.latitude,
            longitude: value.longitude,
        }
    }
}

/// Latest recorded fix.
#[utoipa::path(
    get,
    path = "/api/v1/navigation/position",
    responses(
        (status = 200, description = "Current position", body = PositionPayload),
        (status = 404, description = "No fix recorded yet", body = ErrorSchema)
    ),
    tags = ["navigation"],
    operation_id = "getPosition"
)]
#[get("/navigation/position")]
pub async fn get_position(state: web::Data<HttpState>) -> ApiResult<HttpResponse> {
    let position = state
        .position_query
        .current_position()
        .ok_or_else(|| Error::not_found("no position fix recorded yet"))?;
    Ok(HttpResponse::Ok().json(PositionPayload::from(position)))
}

/// Record a new fix for the next sync cycle.
#[utoipa::path(
    put,
    path = "/api/v1/navigation/position",
    request_body = PositionPayload,
    responses(
        (status = 204, description = "Position recorded"),
        (status = 400, description = "Coordinates out of range", body = ErrorSchema)
    ),
    tags = ["navigation"],
    operation_id = "updatePosition"
)]
#[put("/navigation/position")]
pub async fn update_position(
    state: web::Data<HttpState>,
    payload: web::Json<PositionPayload>,
) -> ApiResult<HttpResponse> {
    state
        .position_command
        .update_position(payload.into_inner().into())?;
    Ok(HttpResponse::NoContent().finish())
}
