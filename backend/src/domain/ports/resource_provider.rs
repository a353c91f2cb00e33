//! Driving port through which an external query layer reads collections.
//!
//! Every registered collection exposes the same four operations. The
//! collections are read-only: they are filled by the sync cycle alone, so
//! `set` and `delete` always fail with `UnsupportedOperation`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::Error;
use crate::domain::resources::ResourceProjection;

/// Query parameters forwarded by the caller. Accepted but not interpreted.
pub type ResourceQuery = BTreeMap<String, String>;

/// Point-in-time listing of one collection, keyed by POI id.
pub type ResourceListing = BTreeMap<String, ResourceProjection>;

/// Port exposing one named resource collection.
#[async_trait]
pub trait ResourceProvider: Send + Sync {
    /// Collection name this provider serves.
    fn collection(&self) -> &str;

    /// Snapshot of the whole collection. An empty collection is not an error.
    async fn list_resources(&self, query: &ResourceQuery) -> Result<ResourceListing, Error>;

    /// Entry for `id`, or `NotFound`.
    async fn get_resource(&self, id: &str) -> Result<ResourceProjection, Error>;

    /// Always fails with `UnsupportedOperation`.
    async fn set_resource(&self, id: &str, value: Value) -> Result<(), Error>;

    /// Always fails with `UnsupportedOperation`.
    async fn delete_resource(&self, id: &str) -> Result<(), Error>;
}
