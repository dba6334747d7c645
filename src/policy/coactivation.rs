//! New edges from co-activation
//!
//! Two nodes activated together only become candidates for a new edge when
//! they are already somewhat similar. The new edge starts provisional and
//! earns its place through the Hebbian engine.

use super::PolicyOutcome;
use crate::config::CoactivationConfig;
use crate::graph::{CreationSource, EdgeStatus};

/// Strictly above the threshold.
pub fn should_consider_new_edge(similarity: f64, config: &CoactivationConfig) -> bool {
    similarity > config.consider_threshold
}

pub fn calculate_coactivation_edge(similarity: f64, config: &CoactivationConfig) -> Option<PolicyOutcome> {
    if !should_consider_new_edge(similarity, config) {
        return None;
    }
    Some(PolicyOutcome {
        weight: config.initial_weight,
        status: EdgeStatus::Provisional,
        confidence: similarity.clamp(0.0, 1.0),
        source: CreationSource::Coactivation,
        extraction_confidence: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_exclusive() {
        let config = CoactivationConfig::default();
        assert!(!should_consider_new_edge(0.50, &config));
        assert!(should_consider_new_edge(0.5001, &config));
    }

    #[test]
    fn new_coactivation_edges_start_provisional() {
        let outcome = calculate_coactivation_edge(0.8, &CoactivationConfig::default()).unwrap();
        assert_eq!(outcome.status, EdgeStatus::Provisional);
        assert_eq!(outcome.weight, 0.30);
        assert_eq!(outcome.confidence, 0.8);
    }

    #[test]
    fn dissimilar_pairs_are_ignored() {
        assert!(calculate_coactivation_edge(0.3, &CoactivationConfig::default()).is_none());
    }
}
