//! Resource façade HTTP handlers.
//!
//! ```text
//! GET    /signalk/v2/api/resources
//! GET    /signalk/v2/api/resources/{collection}
//! GET    /signalk/v2/api/resources/{collection}/{id}
//! PUT    /signalk/v2/api/resources/{collection}/{id}
//! DELETE /signalk/v2/api/resources/{collection}/{id}
//! ```
//!
//! Collections are read-only; writes always answer 405.

use actix_web::{HttpResponse, delete, get, put, web};
use serde::Deserialize;
use serde_json::Value;
use utoipa::IntoParams;

use crate::domain::ports::ResourceQuery;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, NoteResourceSchema};
use crate::inbound::http::state::HttpState;

/// Path parameters addressing one collection.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct CollectionPath {
    /// Registered collection name, e.g. `notes` or `ac_Marina`.
    pub collection: String,
}

/// Path parameters addressing one entry.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Path)]
pub struct ResourcePath {
    /// Registered collection name.
    pub collection: String,
    /// POI identifier.
    pub id: String,
}

/// List registered collection names.
#[utoipa::path(
    get,
    path = "/signalk/v2/api/resources",
    responses((status = 200, description = "Registered collection names", body = [String])),
    tags = ["resources"],
    operation_id = "listCollections"
)]
#[get("/signalk/v2/api/resources")]
pub async fn list_collections(state: web::Data<HttpState>) -> HttpResponse {
    HttpResponse::Ok().json(state.resources.collections())
}

/// List every entry of a collection. Query parameters are passed through to
/// the provider, which does not interpret them.
#[utoipa::path(
    get,
    path = "/signalk/v2/api/resources/{collection}",
    params(CollectionPath),
    responses(
        (status = 200, description = "Entries keyed by POI id", body = Object),
        (status = 404, description = "Collection not registered", body = ErrorSchema)
    ),
    tags = ["resources"],
    operation_id = "listResources"
)]
#[get("/signalk/v2/api/resources/{collection}")]
pub async fn list_resources(
    state: web::Data<HttpState>,
    path: web::Path<CollectionPath>,
    query: web::Query<ResourceQuery>,
) -> ApiResult<HttpResponse> {
    let provider = state.resources.provider(&path.collection)?;
    let listing = provider.list_resources(&query).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// Fetch one entry.
#[utoipa::path(
    get,
    path = "/signalk/v2/api/resources/{collection}/{id}",
    params(ResourcePath),
    responses(
        (status = 200, description = "Entry projection", body = NoteResourceSchema),
        (status = 404, description = "Collection or entry not found", body = ErrorSchema)
    ),
    tags = ["resources"],
    operation_id = "getResource"
)]
#[get("/signalk/v2/api/resources/{collection}/{id}")]
pub async fn get_resource(
    state: web::Data<HttpState>,
    path: web::Path<ResourcePath>,
) -> ApiResult<HttpResponse> {
    let provider = state.resources.provider(&path.collection)?;
    let entry = provider.get_resource(&path.id).await?;
    Ok(HttpResponse::Ok().json(entry))
}

/// Write an entry. Always rejected, whatever the body holds.
#[utoipa::path(
    put,
    path = "/signalk/v2/api/resources/{collection}/{id}",
    params(ResourcePath),
    request_body = Object,
    responses(
        (status = 404, description = "Collection not registered", body = ErrorSchema),
        (status = 405, description = "Collection is read-only", body = ErrorSchema)
    ),
    tags = ["resources"],
    operation_id = "setResource"
)]
#[put("/signalk/v2/api/resources/{collection}/{id}")]
pub async fn set_resource(
    state: web::Data<HttpState>,
    path: web::Path<ResourcePath>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let provider = state.resources.provider(&path.collection)?;
    let value = serde_json::from_slice(&body).unwrap_or(Value::Null);
    provider.set_resource(&path.id, value).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete an entry. Always rejected.
#[utoipa::path(
    delete,
    path = "/signalk/v2/api/resources/{collection}/{id}",
    params(ResourcePath),
    responses(
        (status = 404, description = "Collection not registered", body = ErrorSchema),
        (status = 405, description = "Collection is read-only", body = ErrorSchema)
    ),
    tags = ["resources"],
    operation_id = "deleteResource"
)]
#[delete("/signalk/v2/api/resources/{collection}/{id}")]
pub async fn delete_resource(
    state: web::Data<HttpState>,
    path: web::Path<ResourcePath>,
) -> ApiResult<HttpResponse> {
    let provider = state.resources.provider(&path.collection)?;
    provider.delete_resource(&path.id).await?;
    Ok(HttpResponse::NoContent().finish())
}
