//! # Kensaku
//!
//! The query-execution result core of a full-text search engine.
//!
//! This crate provides the machinery that sits between an index reader and a
//! result consumer:
//!
//! - A composable [`search::searcher::Searcher`] iterator contract with
//!   term, conjunction, disjunction, negation, phrase, fuzzy, match-all and
//!   numeric-range variants, all iterating in strictly increasing internal
//!   document id order.
//! - A poolable [`search::DocumentMatch`] result record with reset/reuse
//!   semantics that avoid per-result heap allocation.
//! - Per-query memory accounting via [`search::MemTracker`] and
//!   `size_in_bytes()` on every result-model entity.
//!
//! Index storage, tokenization and query parsing are external collaborators:
//! the core consumes [`index::PostingsCursor`] streams from an
//! [`index::IndexReader`] and hands back a ranked
//! [`search::DocumentMatchCollection`].

pub mod document;
pub mod error;
pub mod index;
pub mod search;
pub mod util;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
