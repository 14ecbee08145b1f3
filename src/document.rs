//! Stored document bodies and field values.
//!
//! A [`StoredDocument`] is the loaded body of a document, attached lazily to
//! a match when the caller asks for it. Field values use a closed tagged
//! union: text, number, or date. When the same field occurs more than once
//! the value is promoted from a scalar to an ordered sequence, so the
//! promotion rule is explicit rather than hidden behind a dynamically-typed
//! value.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::search::size;

/// A single scalar value of a document field.
///
/// Text fields are serialized as strings, numeric fields as numbers, and
/// date fields as RFC 3339 formatted strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// String data.
    Text(String),
    /// 64-bit floating-point number.
    Number(f64),
    /// UTC timestamp.
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Extract the text value, if this is a text field.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Extract the numeric value, if this is a numeric field.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract the date value, if this is a date field.
    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Structural estimate of this value's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            FieldValue::Text(s) => size::SIZE_OF_STRING + s.len(),
            FieldValue::Number(_) => size::SIZE_OF_F64,
            FieldValue::Date(_) => size::SIZE_OF_DATETIME,
        }
    }
}

/// The value(s) of one named field on a document or match.
///
/// The first occurrence of a field sets `Single`; a second occurrence
/// promotes it to `Multiple`, preserving occurrence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValues {
    /// A field seen exactly once.
    Single(FieldValue),
    /// A field seen more than once, in occurrence order.
    Multiple(Vec<FieldValue>),
}

impl FieldValues {
    /// Append a value, promoting a scalar to a sequence on the second
    /// occurrence.
    pub fn push(&mut self, value: FieldValue) {
        match self {
            FieldValues::Single(existing) => {
                let first = existing.clone();
                *self = FieldValues::Multiple(vec![first, value]);
            }
            FieldValues::Multiple(values) => values.push(value),
        }
    }

    /// Number of values stored.
    pub fn len(&self) -> usize {
        match self {
            FieldValues::Single(_) => 1,
            FieldValues::Multiple(values) => values.len(),
        }
    }

    /// Always false; a `FieldValues` holds at least one value.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate the values in occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldValue> {
        match self {
            FieldValues::Single(value) => std::slice::from_ref(value).iter(),
            FieldValues::Multiple(values) => values.iter(),
        }
    }

    /// Structural estimate of this entry's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            FieldValues::Single(value) => value.size_in_bytes(),
            FieldValues::Multiple(values) => {
                size::SIZE_OF_SLICE + values.iter().map(|v| v.size_in_bytes()).sum::<usize>()
            }
        }
    }
}

impl From<FieldValue> for FieldValues {
    fn from(value: FieldValue) -> Self {
        FieldValues::Single(value)
    }
}

/// A fully loaded document body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    /// The external document id.
    pub id: String,
    /// Stored field values keyed by field name.
    pub fields: HashMap<String, FieldValues>,
    /// Total number of plain-text bytes across the document's fields.
    pub plain_text_bytes: u64,
}

impl StoredDocument {
    /// Create an empty document with the given external id.
    pub fn new<S: Into<String>>(id: S) -> Self {
        StoredDocument {
            id: id.into(),
            fields: HashMap::new(),
            plain_text_bytes: 0,
        }
    }

    /// Add a field value, promoting to a sequence when the field repeats.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        if let FieldValue::Text(text) = &value {
            self.plain_text_bytes += text.len() as u64;
        }
        match self.fields.entry(name.into()) {
            std::collections::hash_map::Entry::Occupied(mut entry) => entry.get_mut().push(value),
            std::collections::hash_map::Entry::Vacant(entry) => {
                entry.insert(FieldValues::Single(value));
            }
        }
    }

    /// Structural estimate of this document's heap footprint.
    pub fn size_in_bytes(&self) -> usize {
        let mut size_in_bytes =
            size::STORED_DOCUMENT_OVERHEAD + self.id.len() + self.plain_text_bytes as usize;
        for (name, values) in &self.fields {
            size_in_bytes += name.len() + size::SIZE_OF_STRING + values.size_in_bytes();
        }
        size_in_bytes
    }
}
