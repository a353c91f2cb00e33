//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the resource façade, position ingestion and health
//! endpoints together with schema wrappers ([`ErrorSchema`],
//! [`NoteResourceSchema`]) that keep domain types free of utoipa derives.

use crate::inbound::http::position::PositionPayload;
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, NoteResourceSchema, PositionSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "ActiveCaptain POI sync API",
        description = "Read-only POI resource collections, position ingestion and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::resources::list_collections,
        crate::inbound::http::resources::list_resources,
        crate::inbound::http::resources::get_resource,
        crate::inbound::http::resources::set_resource,
        crate::inbound::http::resources::delete_resource,
        crate::inbound::http::position::get_position,
        crate::inbound::http::position::update_position,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        NoteResourceSchema,
        PositionSchema,
        PositionPayload,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "resources", description = "POI resource collections"),
        (name = "navigation", description = "Vessel position ingestion"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
