//! Brute-force similarity ranking
//!
//! Simple O(n) full scan: every candidate is scored against the query,
//! then the whole candidate list is sorted and truncated.
//! There is no index; this is adequate for metric catalogs, which stay in
//! the tens of thousands of entries.

use promrag_core::{MetricMetadata, ScoredMetric};

use crate::distance::cosine_similarity;

/// Accumulates scored candidates for one query
pub struct BruteForceRanker<'q> {
    query: &'q [f32],
    candidates: Vec<ScoredMetric>,
}

impl<'q> BruteForceRanker<'q> {
    /// Start ranking against `query`
    pub fn new(query: &'q [f32]) -> Self {
        Self {
            query,
            candidates: Vec::new(),
        }
    }

    /// Score one candidate and keep it
    pub fn push(&mut self, metadata: MetricMetadata, embedding: &[f32]) {
        let score = cosine_similarity(self.query, embedding);
        self.candidates.push(ScoredMetric { metadata, score });
    }

    /// Number of candidates scored so far
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Check if no candidate has been scored
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Sort by (score desc, name asc) and keep the first `limit`
    pub fn finish(mut self, limit: usize) -> Vec<ScoredMetric> {
        if limit == 0 {
            return Vec::new();
        }
        sort_by_relevance(&mut self.candidates);
        self.candidates.truncate(limit);
        self.candidates
    }
}

/// Order hits by descending score; equal scores fall back to name ascending
/// so results are reproducible across runs and backends.
///
/// Uses `f64::total_cmp`, so the order stays total even if a NaN score
/// slips in.
pub fn sort_by_relevance(hits: &mut [ScoredMetric]) {
    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.metadata.name.cmp(&b.metadata.name))
    });
}
