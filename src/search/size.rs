//! Fixed heap-overhead constants for the result-model entity shapes.
//!
//! Every `size_in_bytes()` estimate is (fixed per-shape overhead) +
//! (variable overhead from the shape's current contents). The fixed part
//! depends only on the static layout of the shape, so it is computed once at
//! compile time with `size_of` in const context and treated as read-only.
//! Shapes that live behind a pointer (pool members, boxed explanations,
//! attached documents) also carry one pointer of overhead.

use std::mem::size_of;

use crate::document::StoredDocument;
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;
use crate::search::explanation::Explanation;
use crate::search::location::{Location, TermLocationMap};
use crate::search::pool::DocumentMatchPool;

/// Size of a pointer on this platform.
pub const SIZE_OF_PTR: usize = size_of::<usize>();

/// Size of a u64 element.
pub const SIZE_OF_U64: usize = size_of::<u64>();

/// Size of an f64 element.
pub const SIZE_OF_F64: usize = size_of::<f64>();

/// Header size of an owned string (the character bytes are counted
/// separately by callers).
pub const SIZE_OF_STRING: usize = size_of::<String>();

/// Header size of an owned growable slice.
pub const SIZE_OF_SLICE: usize = size_of::<Vec<u8>>();

/// Size of a UTC timestamp value.
pub const SIZE_OF_DATETIME: usize = size_of::<chrono::DateTime<chrono::Utc>>();

/// Fixed overhead of one pooled [`DocumentMatch`].
pub const DOCUMENT_MATCH_OVERHEAD: usize = size_of::<DocumentMatch>() + SIZE_OF_PTR;

/// Fixed overhead of a document-match collection header.
pub const DOCUMENT_MATCH_COLLECTION_OVERHEAD: usize = SIZE_OF_SLICE;

/// Fixed overhead of one [`Location`].
pub const LOCATION_OVERHEAD: usize = size_of::<Location>() + SIZE_OF_PTR;

/// Fixed overhead of a [`TermLocationMap`] header.
pub const TERM_LOCATION_MAP_OVERHEAD: usize = size_of::<TermLocationMap>();

/// Fixed overhead of one explanation tree node.
pub const EXPLANATION_OVERHEAD: usize = size_of::<Explanation>() + SIZE_OF_PTR;

/// Fixed overhead of an attached [`StoredDocument`].
pub const STORED_DOCUMENT_OVERHEAD: usize = size_of::<StoredDocument>() + SIZE_OF_PTR;

/// Fixed overhead of a [`SearchContext`].
pub const SEARCH_CONTEXT_OVERHEAD: usize = size_of::<SearchContext>() + SIZE_OF_PTR;

/// Fixed overhead of a [`DocumentMatchPool`] header.
pub const DOCUMENT_MATCH_POOL_OVERHEAD: usize = size_of::<DocumentMatchPool>() + SIZE_OF_PTR;
