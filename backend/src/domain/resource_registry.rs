//! Resource façade: one generic provider per registered collection.
//!
//! Collections are registered from a table of names rather than one handler
//! per category. Every provider reads the shared [`PoiState`] directly, so
//! callers see live bucket contents.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::category::{KnownCategory, NOTES_COLLECTION};
use super::ports::{ResourceListing, ResourceProvider, ResourceQuery};
use super::resources::ResourceProjection;
use super::state::PoiState;
use super::Error;

/// Read-only view of one bucket.
#[derive(Debug, Clone)]
pub struct BucketResourceProvider {
    collection: String,
    state: Arc<PoiState>,
}

impl BucketResourceProvider {
    /// Provider serving `collection` out of `state`.
    pub fn new(collection: impl Into<String>, state: Arc<PoiState>) -> Self {
        Self {
            collection: collection.into(),
            state,
        }
    }

    fn read_only(&self, operation: &str, id: &str) -> Error {
        Error::unsupported_operation(format!(
            "{operation} is not supported on collection {}",
            self.collection
        ))
        .with_details(serde_json::json!({
            "collection": self.collection,
            "id": id,
        }))
    }
}

#[async_trait]
impl ResourceProvider for BucketResourceProvider {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn list_resources(&self, query: &ResourceQuery) -> Result<ResourceListing, Error> {
        if !query.is_empty() {
            debug!(
                collection = %self.collection,
                params = query.len(),
                "ignoring resource query parameters"
            );
        }
        Ok(self.state.resources.list(&self.collection))
    }

    async fn get_resource(&self, id: &str) -> Result<ResourceProjection, Error> {
        self.state
            .resources
            .get(&self.collection, id)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "resource {id} not found in {}",
                    self.collection
                ))
            })
    }

    async fn set_resource(&self, id: &str, _value: Value) -> Result<(), Error> {
        Err(self.read_only("set", id))
    }

    async fn delete_resource(&self, id: &str) -> Result<(), Error> {
        Err(self.read_only("delete", id))
    }
}

/// Which collection families to register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistrationToggles {
    /// Register the generic `notes` collection.
    pub note_resources: bool,
    /// Register one `ac_<Category>` collection per known category.
    pub category_resources: bool,
}

impl Default for RegistrationToggles {
    fn default() -> Self {
        Self {
            note_resources: true,
            category_resources: false,
        }
    }
}

impl RegistrationToggles {
    /// Collection names selected by these toggles, notes first.
    pub fn collection_names(&self) -> Vec<String> {
        let notes = self
            .note_resources
            .then(|| NOTES_COLLECTION.to_owned());
        let categories = KnownCategory::ALL
            .iter()
            .filter(|_| self.category_resources)
            .map(|category| category.collection_name());
        notes.into_iter().chain(categories).collect()
    }
}

/// Registered collections, looked up by name.
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    providers: BTreeMap<String, Arc<dyn ResourceProvider>>,
}

impl std::fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("collections", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ResourceRegistry {
    /// Register a bucket provider for every collection the toggles select.
    pub fn from_toggles(toggles: RegistrationToggles, state: &Arc<PoiState>) -> Self {
        let mut registry = Self::default();
        for name in toggles.collection_names() {
            registry.register(Arc::new(BucketResourceProvider::new(name, Arc::clone(state))));
        }
        registry
    }

    /// Add or replace a provider under its collection name.
    pub fn register(&mut self, provider: Arc<dyn ResourceProvider>) {
        self.providers
            .insert(provider.collection().to_owned(), provider);
    }

    /// Provider for `collection`, or `NotFound` when it is not registered.
    pub fn provider(&self, collection: &str) -> Result<Arc<dyn ResourceProvider>, Error> {
        self.providers
            .get(collection)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("collection {collection} is not registered")))
    }

    /// Registered collection names in sorted order.
    pub fn collections(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    /// Whether nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
