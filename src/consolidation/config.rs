//! Graph-size-dependent compression thresholds

use crate::config::CompressionSettings;
use crate::graph::Lifecycle;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GraphSizeTier {
    Small,
    Medium,
    Large,
}

/// Conditions that rule a node out of compression outright.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeverCompressRules {
    pub pinned: bool,
    pub starred: bool,
    pub age_days_less_than: f64,
}

/// Conditions a node must all meet to be a compression candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRequirements {
    pub lifecycle: Lifecycle,
    pub dormant_days_minimum: f64,
    pub importance_max: f64,
    pub strong_active_edges_max: usize,
    pub strong_edge_min_weight: f64,
    pub active_window_days: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringRules {
    pub similarity_threshold: f64,
    pub min_nodes_for_compression: usize,
    pub max_nodes_per_summary: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetentionRules {
    pub restorable_days: i64,
}

/// Effective compression thresholds for one graph size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionConfig {
    pub graph_size: usize,
    pub tier: GraphSizeTier,
    pub never_compress: NeverCompressRules,
    pub candidate_requirements: CandidateRequirements,
    pub clustering: ClusteringRules,
    pub retention: RetentionRules,
}

pub fn graph_size_tier(graph_size: usize, settings: &CompressionSettings) -> GraphSizeTier {
    if graph_size < settings.tiers.small_below {
        GraphSizeTier::Small
    } else if graph_size < settings.tiers.medium_below {
        GraphSizeTier::Medium
    } else {
        GraphSizeTier::Large
    }
}

/// Only the minimum batch size varies with graph size; everything else is fixed.
pub fn get_compression_config(graph_size: usize, settings: &CompressionSettings) -> CompressionConfig {
    let tier = graph_size_tier(graph_size, settings);
    let min_nodes_for_compression = match tier {
        GraphSizeTier::Small => settings.tiers.small_min_nodes,
        GraphSizeTier::Medium => settings.tiers.medium_min_nodes,
        GraphSizeTier::Large => settings.tiers.large_min_nodes,
    };

    CompressionConfig {
        graph_size,
        tier,
        never_compress: NeverCompressRules {
            pinned: true,
            starred: true,
            age_days_less_than: settings.never_compress_age_days,
        },
        candidate_requirements: CandidateRequirements {
            lifecycle: Lifecycle::Dormant,
            dormant_days_minimum: settings.dormant_days_minimum,
            importance_max: settings.importance_max,
            strong_active_edges_max: settings.strong_active_edges_max,
            strong_edge_min_weight: settings.strong_edge_min_weight,
            active_window_days: settings.active_window_days,
        },
        clustering: ClusteringRules {
            similarity_threshold: settings.similarity_threshold,
            min_nodes_for_compression,
            max_nodes_per_summary: settings.max_nodes_per_summary,
        },
        retention: RetentionRules {
            restorable_days: settings.restorable_days,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: usize) -> CompressionConfig {
        get_compression_config(size, &CompressionSettings::default())
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(config(0).tier, GraphSizeTier::Small);
        assert_eq!(config(499).clustering.min_nodes_for_compression, 3);
        assert_eq!(config(500).tier, GraphSizeTier::Medium);
        assert_eq!(config(4999).clustering.min_nodes_for_compression, 5);
        assert_eq!(config(5000).tier, GraphSizeTier::Large);
        assert_eq!(config(1_000_000).clustering.min_nodes_for_compression, 10);
    }

    #[test]
    fn fixed_thresholds_do_not_vary_with_size() {
        let small = config(10);
        let large = config(50_000);
        assert_eq!(small.never_compress, large.never_compress);
        assert_eq!(small.candidate_requirements, large.candidate_requirements);
        assert_eq!(small.retention, large.retention);
        assert_eq!(small.clustering.similarity_threshold, 0.75);
        assert_eq!(large.clustering.max_nodes_per_summary, 20);
        assert_eq!(large.retention.restorable_days, 365);
        assert_eq!(large.candidate_requirements.dormant_days_minimum, 60.0);
        assert_eq!(large.candidate_requirements.importance_max, 0.3);
        assert_eq!(large.candidate_requirements.strong_active_edges_max, 2);
        assert_eq!(large.never_compress.age_days_less_than, 30.0);
    }

    #[test]
    fn serializes_for_ops_visibility() {
        let json = serde_json::to_value(config(1200)).unwrap();
        assert_eq!(json["tier"], "medium");
        assert_eq!(json["candidate_requirements"]["lifecycle"], "dormant");
        assert_eq!(json["clustering"]["min_nodes_for_compression"], 5);
    }
}
