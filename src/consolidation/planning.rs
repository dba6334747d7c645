//! Grouping compression candidates into summary-sized batches

use super::config::CompressionConfig;
use super::eligibility::is_compression_candidate;
use crate::graph::{NodeId, NodeSnapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A node offered for compression, with the signals the planner needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionCandidate {
    pub node: NodeSnapshot,
    pub cluster_id: String,
    /// Cosine similarity to its cluster's centroid
    pub centroid_similarity: f64,
    pub strong_active_edges: usize,
}

/// Nodes to be merged into one summary.
///
/// Only [`plan_compression_batches`] builds one, so every member passed the
/// eligibility rules when the batch was planned. The snapshots are kept so
/// compression can check them again against the edges as they are then.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionBatch {
    cluster_id: String,
    nodes: Vec<NodeSnapshot>,
}

impl CompressionBatch {
    pub(crate) fn new(cluster_id: impl Into<String>, nodes: Vec<NodeSnapshot>) -> Self {
        Self {
            cluster_id: cluster_id.into(),
            nodes,
        }
    }

    pub fn cluster_id(&self) -> &str {
        &self.cluster_id
    }

    pub fn nodes(&self) -> &[NodeSnapshot] {
        &self.nodes
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes.iter().map(|n| &n.id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Group eligible candidates by cluster, then split each cluster into as
/// few batches of at most `max_nodes_per_summary` as possible, evenly
/// sized. Output order is deterministic: clusters by id, nodes by id within
/// a cluster.
pub fn plan_compression_batches(
    candidates: &[CompressionCandidate],
    config: &CompressionConfig,
    now: DateTime<Utc>,
) -> Vec<CompressionBatch> {
    let clustering = &config.clustering;
    let mut by_cluster: BTreeMap<&str, Vec<&NodeSnapshot>> = BTreeMap::new();

    for candidate in candidates {
        if candidate.centroid_similarity < clustering.similarity_threshold {
            tracing::debug!(node = %candidate.node.id, similarity = candidate.centroid_similarity, "too far from cluster centroid");
            continue;
        }
        if !is_compression_candidate(&candidate.node, candidate.strong_active_edges, config, now) {
            continue;
        }
        by_cluster
            .entry(candidate.cluster_id.as_str())
            .or_default()
            .push(&candidate.node);
    }

    let mut batches = Vec::new();
    for (cluster_id, mut nodes) in by_cluster {
        nodes.sort_by(|a, b| a.id.cmp(&b.id));
        nodes.dedup_by(|a, b| a.id == b.id);
        let chunks = balanced_chunks(
            &nodes,
            clustering.min_nodes_for_compression,
            clustering.max_nodes_per_summary,
        );
        let planned: usize = chunks.iter().map(|c| c.len()).sum();
        if planned < nodes.len() {
            tracing::debug!(cluster = cluster_id, left = nodes.len() - planned, "nodes below tier minimum");
        }
        for chunk in chunks {
            batches.push(CompressionBatch::new(
                cluster_id,
                chunk.iter().map(|n| (*n).clone()).collect(),
            ));
        }
    }
    batches
}

/// Split into `ceil(len / max)` chunks whose sizes differ by at most one.
/// When even sizing would fall under `min`, only full chunks of `max` are
/// returned and the remainder waits for a later pass.
fn balanced_chunks<T>(items: &[T], min: usize, max: usize) -> Vec<&[T]> {
    let max = max.max(1);
    let count = items.len().div_ceil(max);
    if count == 0 {
        return Vec::new();
    }
    let (base, extra) = (items.len() / count, items.len() % count);
    if base < min {
        return items.chunks_exact(max).collect();
    }
    let mut rest = items;
    let mut chunks = Vec::with_capacity(count);
    for i in 0..count {
        let (head, tail) = rest.split_at(base + usize::from(i < extra));
        chunks.push(head);
        rest = tail;
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionSettings;
    use crate::consolidation::get_compression_config;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
    }

    fn candidate(id: &str, cluster: &str, similarity: f64) -> CompressionCandidate {
        CompressionCandidate {
            node: NodeSnapshot::new(id, now() - Duration::days(365))
                .dormant_since(now() - Duration::days(120))
                .with_importance(0.1),
            cluster_id: cluster.to_string(),
            centroid_similarity: similarity,
            strong_active_edges: 0,
        }
    }

    #[test]
    fn groups_by_cluster_and_drops_small_groups() {
        let config = get_compression_config(100, &CompressionSettings::default());
        let candidates = vec![
            candidate("n3", "rust", 0.9),
            candidate("n1", "rust", 0.8),
            candidate("n2", "rust", 0.75),
            candidate("m1", "cooking", 0.9),
            candidate("m2", "cooking", 0.9),
        ];

        let batches = plan_compression_batches(&candidates, &config, now());

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].cluster_id, "rust");
        let ids: Vec<&str> = batches[0].node_ids().map(NodeId::as_str).collect();
        assert_eq!(ids, ["n1", "n2", "n3"]);
    }

    #[test]
    fn low_similarity_and_ineligible_nodes_are_excluded() {
        let config = get_compression_config(100, &CompressionSettings::default());
        let mut pinned = candidate("n4", "rust", 0.9);
        pinned.node = pinned.node.pinned();
        let candidates = vec![
            candidate("n1", "rust", 0.9),
            candidate("n2", "rust", 0.9),
            candidate("n3", "rust", 0.74),
            pinned,
        ];

        assert!(plan_compression_batches(&candidates, &config, now()).is_empty());
    }

    #[test]
    fn large_clusters_are_chunked() {
        let config = get_compression_config(100, &CompressionSettings::default());
        let candidates: Vec<_> = (0..42)
            .map(|i| candidate(&format!("n{i:02}"), "rust", 0.9))
            .collect();

        let batches = plan_compression_batches(&candidates, &config, now());

        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.len() == 14), "no eligible node left over");
        assert_eq!(batches[2].node_ids().last().map(NodeId::as_str), Some("n41"));
    }

    #[test]
    fn uneven_clusters_split_within_one_node() {
        let config = get_compression_config(100, &CompressionSettings::default());
        let candidates: Vec<_> = (0..25)
            .map(|i| candidate(&format!("n{i:02}"), "rust", 0.9))
            .collect();

        let sizes: Vec<usize> = plan_compression_batches(&candidates, &config, now())
            .iter()
            .map(CompressionBatch::len)
            .collect();
        assert_eq!(sizes, [13, 12]);
    }

    #[test]
    fn remainder_waits_when_even_split_is_too_small() {
        let mut config = get_compression_config(100, &CompressionSettings::default());
        config.clustering.min_nodes_for_compression = 10;
        config.clustering.max_nodes_per_summary = 10;
        let candidates: Vec<_> = (0..11)
            .map(|i| candidate(&format!("n{i:02}"), "rust", 0.9))
            .collect();

        let batches = plan_compression_batches(&candidates, &config, now());
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].len(), 10);
    }

    #[test]
    fn batch_keeps_member_snapshots() {
        let config = get_compression_config(100, &CompressionSettings::default());
        let candidates = vec![
            candidate("n1", "rust", 0.9),
            candidate("n2", "rust", 0.9),
            candidate("n3", "rust", 0.9),
        ];
        let batch = &plan_compression_batches(&candidates, &config, now())[0];
        assert_eq!(batch.cluster_id(), "rust");
        assert_eq!(batch.nodes()[0], candidates[0].node);
    }
}
