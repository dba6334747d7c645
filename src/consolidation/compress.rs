//! Folding a batch of nodes into a summary node

use super::config::CompressionConfig;
use super::eligibility::{count_strong_active_edges, is_compression_candidate};
use super::planning::CompressionBatch;
use super::state::{create_compression_state, NodeCompressionState};
use super::summary::{
    calculate_aggregated_weight, create_edge_record, create_summary_node, CompressedEdgeRecord,
    SummaryContent, SummaryNode,
};
use crate::config::{AggregationConfig, ProvisionalConfig};
use crate::graph::{CreationSource, EdgeType, NodeId, NousError, NousResult, WeightedEdge};
use crate::policy::{build_edge, PolicyOutcome};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Which side of a boundary edge the compressed set was on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Direction {
    Outgoing,
    Incoming,
}

/// Everything the storage layer writes in one step for a compressed batch.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub summary: SummaryNode,
    /// Edges between the summary and nodes outside the batch
    pub summary_edges: Vec<WeightedEdge>,
    pub states: Vec<(NodeId, NodeCompressionState)>,
    /// Boundary groups whose strongest edge was too weak to carry over
    pub dropped_edge_groups: usize,
}

/// Reject a batch that no longer qualifies: smaller than the tier minimum,
/// or holding a node that fails the candidate rules at `now`.
/// `strong_active_edges` counts a member's strong active edges as they are
/// at compression time.
pub fn check_compression_batch(
    batch: &CompressionBatch,
    config: &CompressionConfig,
    now: DateTime<Utc>,
    strong_active_edges: impl Fn(&NodeId) -> usize,
) -> NousResult<()> {
    if batch.is_empty() {
        return Err(NousError::EmptyBatch);
    }
    let min = config.clustering.min_nodes_for_compression;
    if batch.len() < min {
        return Err(NousError::BatchTooSmall { size: batch.len(), min });
    }
    for node in batch.nodes() {
        if !is_compression_candidate(node, strong_active_edges(&node.id), config, now) {
            tracing::warn!(node = %node.id, cluster = batch.cluster_id(), "batch member no longer eligible");
            return Err(NousError::IneligibleNode(node.id.clone()));
        }
    }
    Ok(())
}

/// Compress `batch` into one summary.
///
/// `edges` must hold every edge touching a batch node. The batch is checked
/// against them first. Every edge touching a batch node is recorded on the
/// summary. Edges crossing the batch boundary are grouped by external node,
/// direction and type, and each group becomes one summary edge when its
/// aggregated weight survives. Edges inside the batch are recorded only.
pub fn compress_batch<'a>(
    batch: &CompressionBatch,
    content: SummaryContent,
    edges: impl IntoIterator<Item = &'a WeightedEdge>,
    config: &CompressionConfig,
    aggregation: &AggregationConfig,
    provisional: &ProvisionalConfig,
    now: DateTime<Utc>,
) -> NousResult<CompressionOutcome> {
    let edges: Vec<&WeightedEdge> = edges.into_iter().collect();
    check_compression_batch(batch, config, now, |id| {
        count_strong_active_edges(id, edges.iter().copied(), config, now)
    })?;

    let members: BTreeSet<&NodeId> = batch.node_ids().collect();
    let mut records: Vec<CompressedEdgeRecord> = Vec::new();
    let mut groups: BTreeMap<(NodeId, Direction, EdgeType), Vec<f64>> = BTreeMap::new();

    for edge in edges {
        let from_inside = members.contains(edge.source());
        let to_inside = members.contains(edge.target());
        let key = match (from_inside, to_inside) {
            (false, false) => continue,
            (true, true) => None,
            (true, false) => Some((edge.target().clone(), Direction::Outgoing, edge.edge_type())),
            (false, true) => Some((edge.source().clone(), Direction::Incoming, edge.edge_type())),
        };
        records.push(create_edge_record(edge));
        if let Some(key) = key {
            groups.entry(key).or_default().push(edge.effective_weight());
        }
    }

    let summary = create_summary_node(
        content,
        batch.node_ids().cloned().collect(),
        records,
        batch.cluster_id().to_string(),
        now,
    );
    let summary_node = summary.id.as_node_id();

    let mut summary_edges = Vec::new();
    let mut dropped_edge_groups = 0;
    for ((external, direction, edge_type), weights) in groups {
        let Some(weight) = calculate_aggregated_weight(weights, aggregation.min_aggregated_weight) else {
            tracing::debug!(summary = %summary.id, external = %external, edge_type = %edge_type, "edge group too weak to preserve");
            dropped_edge_groups += 1;
            continue;
        };
        let outcome = PolicyOutcome::confirmed(weight, 1.0, CreationSource::Compression);
        let (source, target) = match direction {
            Direction::Outgoing => (summary_node.clone(), external),
            Direction::Incoming => (external, summary_node.clone()),
        };
        summary_edges.push(build_edge(source, target, edge_type, &outcome, provisional, now));
    }

    let states = batch
        .node_ids()
        .map(|id| {
            (
                id.clone(),
                create_compression_state(summary.id.clone(), config.retention.restorable_days, now),
            )
        })
        .collect();

    tracing::info!(
        summary = %summary.id,
        cluster = %summary.cluster_id,
        nodes = summary.compressed_from.len(),
        recorded_edges = summary.compressed_edges.len(),
        summary_edges = summary_edges.len(),
        dropped_edge_groups,
        "compressed batch"
    );

    Ok(CompressionOutcome {
        summary,
        summary_edges,
        states,
        dropped_edge_groups,
    })
}
