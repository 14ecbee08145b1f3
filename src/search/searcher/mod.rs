//! Searcher implementations for query execution.
//!
//! A searcher yields, in strictly increasing internal-id order, the
//! documents matching a (sub)query, each paired with a score and optional
//! explanation. Concrete variants compose into an explicit tree of owned
//! children that evaluates a query by merge-iterating child cursors in
//! document-identifier order; each parent exclusively owns its children's
//! lifetime and `close` cascades top-down.

pub mod conjunction;
pub mod disjunction;
pub mod fuzzy;
pub mod match_all;
pub mod negation;
pub mod numeric_range;
pub mod phrase;
pub mod term;

use std::fmt;

use crate::error::{KensakuError, Result};
use crate::search::context::SearchContext;
use crate::search::document_match::DocumentMatch;

pub use self::conjunction::ConjunctionSearcher;
pub use self::disjunction::DisjunctionSearcher;
pub use self::fuzzy::FuzzySearcher;
pub use self::match_all::{MatchAllSearcher, MatchNoneSearcher};
pub use self::negation::NegationSearcher;
pub use self::numeric_range::NumericRangeSearcher;
pub use self::phrase::PhraseSearcher;
pub use self::term::TermSearcher;

/// The polymorphic iterator contract for query evaluation.
///
/// Matches are returned in strictly increasing internal-id order; a searcher
/// violating this breaks every composing ancestor's merge logic. Errors from
/// an underlying postings source propagate unmodified through every
/// composing ancestor.
pub trait Searcher: Send + fmt::Debug {
    /// Return the next match strictly greater than the previously returned
    /// one (or the first match on the initial call), or `None` on
    /// exhaustion.
    fn next(&mut self, ctx: &mut SearchContext) -> Result<Option<DocumentMatch>>;

    /// Position the searcher at the first match with id >= `target` and
    /// return it, or `None` if none exists. A target at or behind the
    /// current position re-returns the current match (as a fresh pooled
    /// record with the same identity); after exhaustion the searcher
    /// remains exhausted.
    fn advance(&mut self, ctx: &mut SearchContext, target: &[u8]) -> Result<Option<DocumentMatch>>;

    /// Release resources held by this searcher and its children. Also the
    /// sole cancellation primitive: closing a node mid-iteration stops the
    /// subtree from yielding results. Child close errors are aggregated so
    /// every child gets a chance to release resources.
    fn close(&mut self) -> Result<()>;

    /// Squared static normalization contribution of this subtree.
    fn weight(&self) -> f64;

    /// Propagate the global normalization factor down the tree; called once
    /// before the first `next`/`advance`.
    fn set_query_norm(&mut self, query_norm: f64);

    /// Upper-bound estimate of how many documents this subtree could match.
    fn count(&self) -> u64;

    /// Minimum number of children (in an optional/disjunction composition)
    /// that must match for this searcher to report a hit. Unrelated to pool
    /// sizing, which is [`Searcher::document_match_pool_size`].
    fn min(&self) -> usize {
        0
    }

    /// Current heap attribution of this searcher subtree.
    fn size_in_bytes(&self) -> usize;

    /// How many `DocumentMatch` records this subtree may need live
    /// simultaneously; used to pre-size the pool before execution starts.
    fn document_match_pool_size(&self) -> usize;
}

/// Compute the query normalization factor from the root's weight and
/// propagate it down the tree. Call once, before iteration begins.
pub fn apply_query_norm(searcher: &mut dyn Searcher) {
    let sum_of_squared_weights = searcher.weight();
    if sum_of_squared_weights > 0.0 {
        searcher.set_query_norm(1.0 / sum_of_squared_weights.sqrt());
    }
}

/// Close every child, collecting errors instead of short-circuiting.
pub(crate) fn close_children(children: &mut [Box<dyn Searcher>]) -> Result<()> {
    let mut errors = Vec::new();
    for child in children.iter_mut() {
        if let Err(err) = child.close() {
            errors.push(err);
        }
    }
    KensakuError::close_aggregate(errors)
}

/// The state of one child position inside a composing searcher.
///
/// `Pending` means the last candidate was consumed and the child must be
/// pulled again before the slot can be compared; children are pulled lazily
/// so that a repeated `advance` with the same target can re-observe the same
/// position.
#[derive(Debug)]
pub(crate) enum ChildSlot {
    /// Needs a pull from the child before the slot can be compared.
    Pending,
    /// The child's current candidate.
    Curr(DocumentMatch),
    /// The child reported exhaustion.
    Exhausted,
}

impl ChildSlot {
    /// Get the candidate's id bytes, if a candidate is held.
    pub(crate) fn id(&self) -> Option<&[u8]> {
        match self {
            ChildSlot::Curr(dm) => Some(dm.internal_id.as_bytes()),
            _ => None,
        }
    }

    /// Take the candidate out, leaving the slot `Pending`.
    pub(crate) fn take(&mut self) -> Option<DocumentMatch> {
        match std::mem::replace(self, ChildSlot::Pending) {
            ChildSlot::Curr(dm) => Some(dm),
            other => {
                *self = other;
                None
            }
        }
    }

    /// Release a held candidate back to the pool, leaving the slot
    /// `Pending`.
    pub(crate) fn release(&mut self, ctx: &mut SearchContext) {
        if let Some(dm) = self.take() {
            ctx.pool.put(dm);
        }
    }

    /// Store the result of pulling the child.
    pub(crate) fn fill(&mut self, pulled: Option<DocumentMatch>) {
        *self = match pulled {
            Some(dm) => ChildSlot::Curr(dm),
            None => ChildSlot::Exhausted,
        };
    }

    /// Check whether the slot needs a pull.
    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, ChildSlot::Pending)
    }

    /// Check whether the child reported exhaustion.
    pub(crate) fn is_exhausted(&self) -> bool {
        matches!(self, ChildSlot::Exhausted)
    }
}
