//! Sort resolved POIs into resource buckets.

use std::collections::BTreeSet;

use super::category::{NOTES_COLLECTION, category_collection_name};
use super::poi::PoiDetail;
use super::resources::{NoteResource, ResourceProjection, ResourceStore};

/// Maps a POI onto the buckets it belongs to.
///
/// The `notes` bucket is always written. The `ac_<category>` bucket is
/// written only when category collections are enabled and the POI carries a
/// non-empty category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceClassifier {
    category_collections: bool,
}

impl ResourceClassifier {
    /// Build a classifier; `category_collections` enables `ac_<category>`.
    pub const fn new(category_collections: bool) -> Self {
        Self {
            category_collections,
        }
    }

    /// Bucket names `detail` belongs to, without touching any store.
    pub fn bucket_names(&self, detail: &PoiDetail) -> BTreeSet<String> {
        let mut names = BTreeSet::from([NOTES_COLLECTION.to_owned()]);
        if let Some(bucket) = self.category_bucket(detail) {
            names.insert(bucket);
        }
        names
    }

    /// Write `detail` into its buckets and return their names.
    ///
    /// ```
    /// use poi_sync::domain::{
    ///     NoteFormat, PoiDetail, PoiDetailRecord, PoiId, Position, ResourceClassifier,
    ///     ResourceStore,
    /// };
    ///
    /// let record = PoiDetailRecord {
    ///     name: "Dock X".to_owned(),
    ///     position: Position::new(47.6, -122.3),
    ///     category: "Marina".to_owned(),
    ///     notes: Vec::new(),
    ///     url: "https://example.invalid/pois/A".to_owned(),
    ///     raw: serde_json::json!({ "name": "Dock X" }),
    /// };
    /// let detail = PoiDetail::from_record(PoiId::from("A"), record, &NoteFormat::default());
    /// let store = ResourceStore::new();
    ///
    /// let buckets = ResourceClassifier::new(true).classify(&detail, &store);
    /// assert!(buckets.contains("notes"));
    /// assert!(buckets.contains("ac_Marina"));
    /// ```
    pub fn classify(&self, detail: &PoiDetail, store: &ResourceStore) -> BTreeSet<String> {
        store.upsert(
            NOTES_COLLECTION,
            &detail.id,
            ResourceProjection::Note(NoteResource::from_detail(detail)),
        );
        let mut updated = BTreeSet::from([NOTES_COLLECTION.to_owned()]);

        if let Some(bucket) = self.category_bucket(detail) {
            store.upsert(&bucket, &detail.id, ResourceProjection::Raw(detail.raw.clone()));
            updated.insert(bucket);
        }
        updated
    }

    fn category_bucket(&self, detail: &PoiDetail) -> Option<String> {
        (self.category_collections && !detail.category.is_empty())
            .then(|| category_collection_name(&detail.category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geo::Position;
    use crate::domain::poi::PoiId;
    use rstest::rstest;
    use serde_json::json;

    fn detail(category: &str) -> PoiDetail {
        PoiDetail {
            id: PoiId::from("A"),
            name: "Dock X".to_owned(),
            position: Position::new(47.6, -122.3),
            category: category.to_owned(),
            notes: vec!["Great facilities".to_owned()],
            short_note: "Great facilities".to_owned(),
            long_note: "1. Great facilities".to_owned(),
            url: "https://example.invalid/pois/A".to_owned(),
            raw: json!({ "name": "Dock X", "poiType": category }),
        }
    }

    #[test]
    fn marina_lands_in_notes_and_its_category_only() {
        let store = ResourceStore::new();
        let updated = ResourceClassifier::new(true).classify(&detail("Marina"), &store);

        assert_eq!(
            updated,
            BTreeSet::from(["ac_Marina".to_owned(), "notes".to_owned()])
        );
        assert_eq!(store.bucket_names(), vec!["ac_Marina", "notes"]);
        assert_eq!(
            store.get("ac_Marina", "A"),
            Some(ResourceProjection::Raw(
                json!({ "name": "Dock X", "poiType": "Marina" })
            ))
        );
        assert!(store.list("ac_Anchorage").is_empty());
    }

    #[test]
    fn notes_projection_uses_long_note_and_group() {
        let store = ResourceStore::new();
        ResourceClassifier::default().classify(&detail("Marina"), &store);

        let Some(ResourceProjection::Note(note)) = store.get("notes", "A") else {
            panic!("notes bucket should hold a note projection");
        };
        assert_eq!(note.description, "1. Great facilities");
        assert_eq!(note.group, "Marina");
    }

    #[rstest]
    #[case::disabled(false, "Marina")]
    #[case::empty_category(true, "")]
    fn skips_category_bucket(#[case] enabled: bool, #[case] category: &str) {
        let store = ResourceStore::new();
        let classifier = ResourceClassifier::new(enabled);

        let updated = classifier.classify(&detail(category), &store);

        assert_eq!(updated, BTreeSet::from(["notes".to_owned()]));
        assert_eq!(classifier.bucket_names(&detail(category)), updated);
        assert_eq!(store.bucket_names(), vec!["notes"]);
    }

    #[test]
    fn category_is_used_verbatim() {
        let names = ResourceClassifier::new(true).bucket_names(&detail("local knowledge"));
        assert!(names.contains("ac_local knowledge"));
    }
}
