//! The per-match result record and the ranked collection shape.

use std::collections::HashMap;
use std::fmt;
use std::mem;

use serde::{Deserialize, Serialize};

use crate::document::{FieldValue, FieldValues, StoredDocument};
use crate::error::Result;
use crate::index::{IndexReader, InternalId};
use crate::search::explanation::Explanation;
use crate::search::location::{FieldFragmentMap, FieldTermLocationMap};
use crate::search::size;

/// One scored candidate result.
///
/// Instances are borrowed from a [`crate::search::pool::DocumentMatchPool`],
/// populated during iteration, handed to the caller, and released back to
/// the pool when no longer needed. [`DocumentMatch::reset`] clears every
/// field but keeps the backing storage of the internal-id and sort buffers,
/// so a match recycled many times reuses its own allocations.
///
/// Serialized form: keys `index, id, score, explanation, locations,
/// fragments, sort, fields`, with everything except `id` and `score` omitted
/// when empty. The internal id, attached document and hit number are
/// bookkeeping and never serialized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMatch {
    /// Name of the index the match came from; may be empty until late-bound.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub index: String,

    /// Human-visible document id; may be empty until late-bound.
    pub id: String,

    /// Internal document identifier; owned by the match for its lifetime.
    #[serde(skip)]
    pub internal_id: InternalId,

    /// Relevance score; higher is more relevant.
    pub score: f64,

    /// How the score was derived; present only in explain mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Box<Explanation>>,

    /// Term occurrence locations, present only when term vectors were
    /// requested.
    #[serde(default, skip_serializing_if = "FieldTermLocationMap::is_empty")]
    pub locations: FieldTermLocationMap,

    /// Highlighted fragments, present only when highlighting ran.
    #[serde(default, skip_serializing_if = "FieldFragmentMap::is_empty")]
    pub fragments: FieldFragmentMap,

    /// Sort-key strings for custom sort orders; reusable buffer.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<String>,

    /// Requested field values; a repeated field promotes to a sequence.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub fields: HashMap<String, FieldValues>,

    /// Loaded document body, cached so it is only loaded once.
    #[serde(skip)]
    pub document: Option<StoredDocument>,

    /// Monotonic sequence number in natural iteration order; stable
    /// secondary sort key independent of score.
    #[serde(skip)]
    pub hit_number: u64,
}

impl DocumentMatch {
    /// Create an empty match.
    pub fn new() -> Self {
        DocumentMatch::default()
    }

    /// Clear every field for reuse, preserving the backing storage of the
    /// internal-id and sort buffers (truncated to zero length, capacity
    /// kept).
    pub fn reset(&mut self) -> &mut Self {
        // Remember the buffers that survive a reset.
        let mut internal_id = mem::take(&mut self.internal_id);
        let mut sort = mem::take(&mut self.sort);
        internal_id.clear();
        sort.clear();

        *self = DocumentMatch::default();
        self.internal_id = internal_id;
        self.sort = sort;
        self
    }

    /// Add a field value, promoting to a sequence when the field repeats.
    pub fn add_field_value<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        match self.fields.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(FieldValues::Single(value));
            }
        }
    }

    /// Load and cache the stored document body for this match.
    pub fn load_document(&mut self, reader: &dyn IndexReader) -> Result<Option<&StoredDocument>> {
        if self.document.is_none() {
            self.document = reader.document(self.internal_id.as_bytes())?;
        }
        Ok(self.document.as_ref())
    }

    /// Structural estimate of this match's current heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes = size::DOCUMENT_MATCH_OVERHEAD
            + self.index.len()
            + self.id.len()
            + self.internal_id.len();

        if let Some(explanation) = &self.explanation {
            size_in_bytes += explanation.size_in_bytes();
        }

        size_in_bytes += self.locations.size_in_bytes();
        size_in_bytes += self.fragments.size_in_bytes();

        for entry in &self.sort {
            size_in_bytes += entry.len() + size::SIZE_OF_STRING;
        }

        for (name, values) in &self.fields {
            size_in_bytes += name.len() + size::SIZE_OF_STRING + values.size_in_bytes();
        }

        if let Some(document) = &self.document {
            size_in_bytes += document.size_in_bytes();
        }

        size_in_bytes
    }
}

impl fmt::Display for DocumentMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}-{}]", self.internal_id, self.score)
    }
}

/// An ordered sequence of matches; the ranked output shape of a query.
///
/// Natural order is higher score first. Ties are not defined by score alone;
/// [`DocumentMatchCollection::sort_by_score`] additionally breaks ties on
/// hit number so callers get a deterministic order.
#[derive(Debug, Default, Serialize)]
#[serde(transparent)]
pub struct DocumentMatchCollection(Vec<DocumentMatch>);

impl DocumentMatchCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        DocumentMatchCollection::default()
    }

    /// Append a match.
    pub fn push(&mut self, document_match: DocumentMatch) {
        self.0.push(document_match);
    }

    /// Number of matches held.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// View the matches as a slice.
    pub fn as_slice(&self) -> &[DocumentMatch] {
        &self.0
    }

    /// Iterate the matches in current order.
    pub fn iter(&self) -> impl Iterator<Item = &DocumentMatch> {
        self.0.iter()
    }

    /// Sort by score descending, breaking ties by hit number ascending.
    pub fn sort_by_score(&mut self) {
        self.0.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.hit_number.cmp(&b.hit_number))
        });
    }

    /// Structural estimate of the collection's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes = size::DOCUMENT_MATCH_COLLECTION_OVERHEAD;
        for entry in &self.0 {
            size_in_bytes += entry.size_in_bytes();
        }
        size_in_bytes
    }
}

impl From<Vec<DocumentMatch>> for DocumentMatchCollection {
    fn from(matches: Vec<DocumentMatch>) -> Self {
        DocumentMatchCollection(matches)
    }
}

impl IntoIterator for DocumentMatchCollection {
    type Item = DocumentMatch;
    type IntoIter = std::vec::IntoIter<DocumentMatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl std::ops::Index<usize> for DocumentMatchCollection {
    type Output = DocumentMatch;

    fn index(&self, index: usize) -> &DocumentMatch {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::location::Location;

    #[test]
    fn test_reset_preserves_buffer_capacity() {
        let mut dm = DocumentMatch::new();
        dm.internal_id.copy_from(b"a-rather-long-internal-key");
        dm.sort.push("zebra".to_string());
        dm.sort.push("apple".to_string());
        dm.score = 4.2;
        dm.id = "doc".to_string();
        dm.locations.add_location("body", "tree", Location::default());

        let id_cap = dm.internal_id.capacity();
        let sort_cap = dm.sort.capacity();

        dm.reset();

        assert_eq!(dm.score, 0.0);
        assert!(dm.id.is_empty());
        assert!(dm.locations.is_empty());
        assert!(dm.fields.is_empty());
        assert_eq!(dm.internal_id.len(), 0);
        assert_eq!(dm.internal_id.capacity(), id_cap);
        assert!(dm.sort.is_empty());
        assert_eq!(dm.sort.capacity(), sort_cap);
    }

    #[test]
    fn test_add_field_value_promotion() {
        let mut dm = DocumentMatch::new();
        dm.add_field_value("tags", FieldValue::Text("a".to_string()));
        assert!(matches!(
            dm.fields.get("tags"),
            Some(FieldValues::Single(_))
        ));

        dm.add_field_value("tags", FieldValue::Text("b".to_string()));
        match dm.fields.get("tags") {
            Some(FieldValues::Multiple(values)) => assert_eq!(values.len(), 2),
            other => panic!("expected Multiple, got {other:?}"),
        }
    }

    #[test]
    fn test_size_in_bytes_monotonic_in_locations() {
        let mut dm = DocumentMatch::new();
        let before = dm.size_in_bytes();

        dm.locations.add_location("body", "tree", Location::default());
        let after = dm.size_in_bytes();
        assert!(after > before);

        dm.locations
            .add_location("body", "tree", Location { pos: 2, ..Location::default() });
        assert!(dm.size_in_bytes() > after);
    }

    #[test]
    fn test_json_shape() {
        let mut dm = DocumentMatch::new();
        dm.id = "doc1".to_string();
        dm.internal_id.copy_from(b"\x00\x01");
        dm.score = 1.5;
        dm.hit_number = 9;

        let json = serde_json::to_value(&dm).unwrap();
        // id and score always present; empties and bookkeeping omitted.
        assert_eq!(json["id"], "doc1");
        assert_eq!(json["score"], 1.5);
        assert!(json.get("index").is_none());
        assert!(json.get("locations").is_none());
        assert!(json.get("sort").is_none());
        assert!(json.get("fields").is_none());
        assert!(json.get("internal_id").is_none());
        assert!(json.get("hit_number").is_none());
        assert!(json.get("document").is_none());

        dm.index = "idx".to_string();
        dm.add_field_value("title", FieldValue::Text("hello".to_string()));
        let json = serde_json::to_value(&dm).unwrap();
        assert_eq!(json["index"], "idx");
        assert_eq!(json["fields"]["title"], "hello");
    }

    #[test]
    fn test_collection_sort_is_deterministic() {
        let mut collection = DocumentMatchCollection::new();
        for (score, hit_number) in [(1.0, 2), (2.0, 1), (1.0, 0)] {
            let mut dm = DocumentMatch::new();
            dm.score = score;
            dm.hit_number = hit_number;
            collection.push(dm);
        }

        collection.sort_by_score();
        assert_eq!(collection[0].score, 2.0);
        // Equal scores fall back to natural iteration order.
        assert_eq!(collection[1].hit_number, 0);
        assert_eq!(collection[2].hit_number, 2);
    }

    #[test]
    fn test_collection_size_includes_entries() {
        let mut collection = DocumentMatchCollection::new();
        let empty = collection.size_in_bytes();
        collection.push(DocumentMatch::new());
        assert!(collection.size_in_bytes() > empty);
    }
}
