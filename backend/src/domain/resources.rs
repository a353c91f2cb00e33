//! Named resource buckets filled by the classifier.
//!
//! Layout is `bucket name → POI id → projection`. Buckets appear lazily on
//! the first entry and are never removed.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use serde::Serialize;
use serde_json::Value;

use super::geo::Position;
use super::poi::{PoiDetail, PoiId};

/// Projection stored in the generic `notes` bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NoteResource {
    /// POI display name.
    pub name: String,
    /// Every note, numbered.
    pub description: String,
    /// POI location.
    pub position: Position,
    /// Raw remote category.
    pub group: String,
    /// Public page for the POI.
    pub url: String,
}

impl NoteResource {
    /// Project a resolved POI into a note resource.
    pub fn from_detail(detail: &PoiDetail) -> Self {
        Self {
            name: detail.name.clone(),
            description: detail.long_note.clone(),
            position: detail.position,
            group: detail.category.clone(),
            url: detail.url.clone(),
        }
    }
}

/// Bucket entry: a note projection or the raw remote payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceProjection {
    /// Entry of the generic `notes` bucket.
    Note(NoteResource),
    /// Entry of a category bucket: the `pointOfInterest` object as received.
    Raw(Value),
}

type Bucket = BTreeMap<String, ResourceProjection>;

/// Thread-safe bucket store. Reads return owned copies.
#[derive(Debug, Default)]
pub struct ResourceStore {
    buckets: RwLock<BTreeMap<String, Bucket>>,
}

impl ResourceStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `id` in `bucket`, creating the bucket
    /// when needed.
    pub fn upsert(&self, bucket: &str, id: &PoiId, projection: ResourceProjection) {
        let mut buckets = self.buckets.write().unwrap_or_else(PoisonError::into_inner);
        buckets
            .entry(bucket.to_owned())
            .or_default()
            .insert(id.as_str().to_owned(), projection);
    }

    /// Snapshot of one bucket; empty when the bucket does not exist yet.
    pub fn list(&self, bucket: &str) -> BTreeMap<String, ResourceProjection> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets.get(bucket).cloned().unwrap_or_default()
    }

    /// Entry for `id` in `bucket`.
    pub fn get(&self, bucket: &str, id: &str) -> Option<ResourceProjection> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets.get(bucket).and_then(|entries| entries.get(id)).cloned()
    }

    /// Names of every bucket created so far.
    pub fn bucket_names(&self) -> Vec<String> {
        let buckets = self.buckets.read().unwrap_or_else(PoisonError::into_inner);
        buckets.keys().cloned().collect()
    }
}
