//! Positional metadata attached to a match for highlighting and explain
//! purposes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::search::size;

/// One occurrence of a term within a field of a matched document.
///
/// Immutable once constructed. `array_positions` records which element(s)
/// of an array-valued field the occurrence belongs to, needed because one
/// field may be repeated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Position of the term within the field, starting at 1.
    pub pos: u64,
    /// Byte offset where the term starts.
    pub start: u64,
    /// Byte offset where the term ends.
    pub end: u64,
    /// Positions of the term within any array-valued field elements.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub array_positions: Vec<u64>,
}

impl Location {
    /// Structural estimate of this location's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        size::LOCATION_OVERHEAD + self.array_positions.len() * size::SIZE_OF_U64
    }
}

/// Mapping from term text to the ordered locations where it occurs.
///
/// Insertion order within a term's location list is discovery order, and
/// duplicates are allowed: the same term can occur at many positions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TermLocationMap(HashMap<String, Vec<Location>>);

impl TermLocationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        TermLocationMap::default()
    }

    /// Record one more location for a term.
    pub fn add_location<S: Into<String>>(&mut self, term: S, location: Location) {
        self.0.entry(term.into()).or_default().push(location);
    }

    /// Get the locations recorded for a term.
    pub fn get(&self, term: &str) -> Option<&[Location]> {
        self.0.get(term).map(|locs| locs.as_slice())
    }

    /// Check whether any locations are recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct terms recorded.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over (term, locations) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Location>)> {
        self.0.iter()
    }

    /// Merge another term-location map into this one, appending locations.
    pub fn merge(&mut self, other: TermLocationMap) {
        for (term, locations) in other.0 {
            self.0.entry(term).or_default().extend(locations);
        }
    }

    /// Structural estimate of this map's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes = size::TERM_LOCATION_MAP_OVERHEAD;
        for (term, locations) in &self.0 {
            size_in_bytes += term.len() + size::SIZE_OF_STRING + size::SIZE_OF_SLICE;
            for location in locations {
                size_in_bytes += location.size_in_bytes();
            }
        }
        size_in_bytes
    }
}

/// Mapping from field name to the term locations recorded within it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTermLocationMap(HashMap<String, TermLocationMap>);

impl FieldTermLocationMap {
    /// Create an empty map.
    pub fn new() -> Self {
        FieldTermLocationMap::default()
    }

    /// Record one more location for a term within a field.
    pub fn add_location<F, T>(&mut self, field: F, term: T, location: Location)
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.0
            .entry(field.into())
            .or_default()
            .add_location(term, location);
    }

    /// Get the term locations recorded for a field.
    pub fn get(&self, field: &str) -> Option<&TermLocationMap> {
        self.0.get(field)
    }

    /// Check whether any locations are recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Merge another field-term-location map into this one.
    pub fn merge(&mut self, other: FieldTermLocationMap) {
        for (field, term_locations) in other.0 {
            match self.0.entry(field) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    entry.get_mut().merge(term_locations)
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    entry.insert(term_locations);
                }
            }
        }
    }

    /// Structural estimate of this map's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes = 0;
        for (field, term_locations) in &self.0 {
            size_in_bytes +=
                field.len() + size::SIZE_OF_STRING + term_locations.size_in_bytes();
        }
        size_in_bytes
    }
}

/// Mapping from field name to highlighted text fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldFragmentMap(HashMap<String, Vec<String>>);

impl FieldFragmentMap {
    /// Create an empty map.
    pub fn new() -> Self {
        FieldFragmentMap::default()
    }

    /// Append a highlighted fragment for a field.
    pub fn add_fragment<F, S>(&mut self, field: F, fragment: S)
    where
        F: Into<String>,
        S: Into<String>,
    {
        self.0.entry(field.into()).or_default().push(fragment.into());
    }

    /// Get the fragments recorded for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(|frags| frags.as_slice())
    }

    /// Check whether any fragments are recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Structural estimate of this map's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes = 0;
        for (field, fragments) in &self.0 {
            size_in_bytes += field.len() + size::SIZE_OF_STRING + size::SIZE_OF_SLICE;
            for fragment in fragments {
                size_in_bytes += fragment.len() + size::SIZE_OF_STRING;
            }
        }
        size_in_bytes
    }
}
