//! Scoring for search results.
//!
//! The scoring math here is a tf–idf form kept deliberately behind these
//! structs; searchers rely only on the structural contract: scores are f64,
//! leaf weights combine into a query norm propagated once before iteration,
//! composite scores combine by addition, and explain mode produces an
//! explanation tree owned by the match.

use crate::index::TermPosting;
use crate::search::context::{SearchContext, SearcherOptions};
use crate::search::document_match::DocumentMatch;
use crate::search::explanation::Explanation;
use crate::search::location::Location;

/// Scorer for a single term in a single field.
#[derive(Debug)]
pub struct TermScorer {
    field: String,
    term: String,
    boost: f64,
    idf: f64,
    options: SearcherOptions,
    query_norm: f64,
    query_weight: f64,
}

impl TermScorer {
    /// Create a scorer from term statistics.
    pub fn new<F, T>(
        field: F,
        term: T,
        doc_freq: u64,
        total_docs: u64,
        boost: f64,
        options: SearcherOptions,
    ) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        let idf = if total_docs == 0 {
            0.0
        } else {
            1.0 + (total_docs as f64 / (doc_freq as f64 + 1.0)).ln()
        };
        TermScorer {
            field: field.into(),
            term: term.into(),
            boost,
            idf,
            options,
            query_norm: 1.0,
            query_weight: boost * idf,
        }
    }

    /// Squared contribution of this leaf to the query norm.
    pub fn weight(&self) -> f64 {
        let w = self.boost * self.idf;
        w * w
    }

    /// Apply the global normalization factor; called once before iteration.
    pub fn set_query_norm(&mut self, query_norm: f64) {
        self.query_norm = query_norm;
        self.query_weight = self.boost * self.idf * self.query_norm;
    }

    /// Build a scored match for the current posting, drawing the record from
    /// the context pool.
    pub fn score(&self, ctx: &mut SearchContext, posting: &TermPosting) -> DocumentMatch {
        let tf = (posting.frequency as f64).sqrt();
        let field_weight = tf * self.idf;
        let score = field_weight * self.query_weight;

        let mut rv = ctx.pool.get();
        rv.internal_id.copy_from(posting.doc.as_bytes());
        rv.score = score;

        if self.options.explain {
            let mut children = vec![
                Explanation::new(tf, format!("tf(termFreq={})", posting.frequency)),
                Explanation::new(self.idf, format!("idf(field={})", self.field)),
            ];
            let field_explanation = Explanation::with_children(
                field_weight,
                format!("fieldWeight({}:{}), product of", self.field, self.term),
                std::mem::take(&mut children),
            );
            let explanation = if (self.query_weight - 1.0).abs() < f64::EPSILON {
                field_explanation
            } else {
                Explanation::with_children(
                    score,
                    format!("weight({}:{}), product of", self.field, self.term),
                    vec![
                        Explanation::new(
                            self.query_weight,
                            format!("queryWeight, boost={} norm={}", self.boost, self.query_norm),
                        ),
                        field_explanation,
                    ],
                )
            };
            rv.explanation = Some(Box::new(explanation));
        }

        if self.options.include_term_vectors {
            for position in &posting.positions {
                rv.locations.add_location(
                    self.field.clone(),
                    self.term.clone(),
                    Location {
                        pos: position.pos,
                        start: position.start,
                        end: position.end,
                        array_positions: position.array_positions.clone(),
                    },
                );
            }
        }

        rv
    }
}

/// Scorer that assigns the same score to every match (match-all, negation).
#[derive(Debug)]
pub struct ConstantScorer {
    boost: f64,
    options: SearcherOptions,
    query_norm: f64,
    query_weight: f64,
}

impl ConstantScorer {
    /// Create a constant scorer.
    pub fn new(boost: f64, options: SearcherOptions) -> Self {
        ConstantScorer {
            boost,
            options,
            query_norm: 1.0,
            query_weight: boost,
        }
    }

    /// Squared contribution of this node to the query norm.
    pub fn weight(&self) -> f64 {
        self.boost * self.boost
    }

    /// Apply the global normalization factor.
    pub fn set_query_norm(&mut self, query_norm: f64) {
        self.query_norm = query_norm;
        self.query_weight = self.boost * self.query_norm;
    }

    /// Build a match for a document id with the constant score.
    pub fn score(&self, ctx: &mut SearchContext, id: &[u8]) -> DocumentMatch {
        let mut rv = ctx.pool.get();
        rv.internal_id.copy_from(id);
        rv.score = self.query_weight;
        if self.options.explain {
            rv.explanation = Some(Box::new(Explanation::new(
                self.query_weight,
                format!("ConstantScore, boost={} norm={}", self.boost, self.query_norm),
            )));
        }
        rv
    }
}

/// Combines child matches aligned on the same document into one conjunction
/// match.
#[derive(Debug)]
pub struct ConjunctionScorer {
    options: SearcherOptions,
}

impl ConjunctionScorer {
    /// Create a conjunction scorer.
    pub fn new(options: SearcherOptions) -> Self {
        ConjunctionScorer { options }
    }

    /// Combine constituents into a single match: scores add, locations
    /// merge, and every constituent record is released back to the pool.
    pub fn score(
        &self,
        ctx: &mut SearchContext,
        constituents: Vec<DocumentMatch>,
    ) -> DocumentMatch {
        debug_assert!(!constituents.is_empty());

        let mut rv = ctx.pool.get();
        rv.internal_id
            .copy_from(constituents[0].internal_id.as_bytes());

        let mut sum = 0.0;
        let mut children = Vec::new();
        for mut constituent in constituents {
            sum += constituent.score;
            rv.locations.merge(std::mem::take(&mut constituent.locations));
            if self.options.explain {
                if let Some(explanation) = constituent.explanation.take() {
                    children.push(*explanation);
                }
            }
            ctx.pool.put(constituent);
        }

        rv.score = sum;
        if self.options.explain {
            rv.explanation = Some(Box::new(Explanation::with_children(
                sum,
                "sum of",
                children,
            )));
        }
        rv
    }
}

/// Combines the child matches present at the minimum document of a
/// disjunction into one match.
#[derive(Debug)]
pub struct DisjunctionScorer {
    options: SearcherOptions,
}

impl DisjunctionScorer {
    /// Create a disjunction scorer.
    pub fn new(options: SearcherOptions) -> Self {
        DisjunctionScorer { options }
    }

    /// Combine the matching constituents, normalizing the summed score by
    /// the fraction of clauses that matched. Constituents are released back
    /// to the pool.
    pub fn score(
        &self,
        ctx: &mut SearchContext,
        constituents: Vec<DocumentMatch>,
        total_clauses: usize,
    ) -> DocumentMatch {
        debug_assert!(!constituents.is_empty());
        debug_assert!(total_clauses >= constituents.len());

        let matching = constituents.len();
        let mut rv = ctx.pool.get();
        rv.internal_id
            .copy_from(constituents[0].internal_id.as_bytes());

        let mut sum = 0.0;
        let mut children = Vec::new();
        for mut constituent in constituents {
            sum += constituent.score;
            rv.locations.merge(std::mem::take(&mut constituent.locations));
            if self.options.explain {
                if let Some(explanation) = constituent.explanation.take() {
                    children.push(*explanation);
                }
            }
            ctx.pool.put(constituent);
        }

        let coord = matching as f64 / total_clauses as f64;
        rv.score = sum * coord;
        if self.options.explain {
            let sum_explanation = Explanation::with_children(sum, "sum of", children);
            rv.explanation = Some(Box::new(Explanation::with_children(
                rv.score,
                format!("product of sum and coord({matching}/{total_clauses})"),
                vec![sum_explanation, Explanation::new(coord, "coord")],
            )));
        }
        rv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::InternalId;

    fn posting(id: &[u8], frequency: u32) -> TermPosting {
        TermPosting::with_frequency(InternalId::from_bytes(id), frequency)
    }

    #[test]
    fn test_term_scorer_higher_tf_scores_higher() {
        let scorer = TermScorer::new("body", "tree", 10, 1000, 1.0, SearcherOptions::default());
        let mut ctx = SearchContext::new(4);

        let low = scorer.score(&mut ctx, &posting(b"1", 1));
        let high = scorer.score(&mut ctx, &posting(b"2", 4));
        assert!(high.score > low.score);
        assert!(low.score > 0.0);

        ctx.pool.put(low);
        ctx.pool.put(high);
    }

    #[test]
    fn test_term_scorer_explanation() {
        let options = SearcherOptions::default().with_explain(true);
        let scorer = TermScorer::new("body", "tree", 10, 1000, 2.0, options);
        let mut ctx = SearchContext::new(2);

        let dm = scorer.score(&mut ctx, &posting(b"1", 1));
        let explanation = dm.explanation.as_ref().expect("explain mode set");
        assert_eq!(explanation.value, dm.score);
        assert!(!explanation.children.is_empty());
        ctx.pool.put(dm);
    }

    #[test]
    fn test_query_norm_scales_score() {
        let mut scorer = TermScorer::new("body", "tree", 10, 1000, 1.0, SearcherOptions::default());
        let mut ctx = SearchContext::new(2);

        let unnormalized = scorer.score(&mut ctx, &posting(b"1", 1));
        scorer.set_query_norm(0.5);
        let normalized = scorer.score(&mut ctx, &posting(b"1", 1));

        assert!((normalized.score - unnormalized.score * 0.5).abs() < 1e-9);
        ctx.pool.put(unnormalized);
        ctx.pool.put(normalized);
    }

    #[test]
    fn test_conjunction_scorer_sums_and_releases() {
        let scorer = ConjunctionScorer::new(SearcherOptions::default());
        let mut ctx = SearchContext::new(4);

        let mut a = ctx.pool.get();
        a.internal_id.copy_from(b"7");
        a.score = 1.5;
        let mut b = ctx.pool.get();
        b.internal_id.copy_from(b"7");
        b.score = 0.5;

        let combined = scorer.score(&mut ctx, vec![a, b]);
        assert_eq!(combined.score, 2.0);
        assert_eq!(combined.internal_id.as_bytes(), b"7");
        // Both constituents went back to the pool.
        assert_eq!(ctx.pool.outstanding(), 1);
        ctx.pool.put(combined);
    }

    #[test]
    fn test_disjunction_scorer_coord() {
        let scorer = DisjunctionScorer::new(SearcherOptions::default());
        let mut ctx = SearchContext::new(4);

        let mut a = ctx.pool.get();
        a.internal_id.copy_from(b"3");
        a.score = 2.0;

        let combined = scorer.score(&mut ctx, vec![a], 2);
        // One of two clauses matched.
        assert_eq!(combined.score, 1.0);
        ctx.pool.put(combined);
    }
}
