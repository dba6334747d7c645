//! Edges from embedding similarity
//!
//! The similarity score is used directly as the weight. Scores computed
//! from stale embeddings must not be trusted; [`similarity_edge_if_fresh`]
//! applies that check for callers holding the freshness records.

use super::PolicyOutcome;
use crate::config::SimilarityConfig;
use crate::graph::{CreationSource, EmbeddingFreshnessState};

pub fn meets_similarity_threshold(cosine_similarity: f64, config: &SimilarityConfig) -> bool {
    cosine_similarity >= config.threshold
}

pub fn calculate_similarity_edge(cosine_similarity: f64, config: &SimilarityConfig) -> Option<PolicyOutcome> {
    if !meets_similarity_threshold(cosine_similarity, config) {
        return None;
    }
    let weight = cosine_similarity.min(1.0);
    Some(PolicyOutcome::confirmed(weight, weight, CreationSource::Similarity))
}

/// Like [`calculate_similarity_edge`], but only when both endpoint
/// embeddings are fresh.
pub fn similarity_edge_if_fresh(
    cosine_similarity: f64,
    source: &EmbeddingFreshnessState,
    target: &EmbeddingFreshnessState,
    config: &SimilarityConfig,
) -> Option<PolicyOutcome> {
    if !(source.is_fresh() && target.is_fresh()) {
        tracing::debug!(cosine_similarity, "stale embedding, similarity not trusted");
        return None;
    }
    calculate_similarity_edge(cosine_similarity, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn threshold_is_inclusive() {
        let config = SimilarityConfig::default();
        assert!(meets_similarity_threshold(0.85, &config));
        assert!(!meets_similarity_threshold(0.8499, &config));
    }

    #[test]
    fn weight_is_the_similarity() {
        let outcome = calculate_similarity_edge(0.91, &SimilarityConfig::default()).unwrap();
        assert_eq!(outcome.weight, 0.91);
        assert_eq!(outcome.source, CreationSource::Similarity);
    }

    #[test]
    fn below_threshold_creates_nothing() {
        assert!(calculate_similarity_edge(0.7, &SimilarityConfig::default()).is_none());
    }

    #[test]
    fn stale_embedding_blocks_edge() {
        let t0 = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let fresh = EmbeddingFreshnessState {
            embedding_version: 1,
            last_content_update: t0,
            last_embedding_update: t0 + Duration::minutes(5),
        };
        let stale = EmbeddingFreshnessState {
            last_content_update: t0 + Duration::hours(1),
            ..fresh
        };
        let config = SimilarityConfig::default();

        assert!(similarity_edge_if_fresh(0.95, &fresh, &fresh, &config).is_some());
        assert!(similarity_edge_if_fresh(0.95, &fresh, &stale, &config).is_none());
        assert!(similarity_edge_if_fresh(0.95, &stale, &fresh, &config).is_none());
    }
}
