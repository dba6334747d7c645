//! Which dormant nodes may be compressed
//!
//! Never-compress rules are checked first and short-circuit everything
//! else. A node that survives them must meet every candidate requirement.

use super::config::CompressionConfig;
use crate::clock::days_between;
use crate::graph::{NodeId, NodeSnapshot, WeightedEdge};
use chrono::{DateTime, Utc};

/// Pinned, starred, or too young: in that order, first hit wins.
pub fn is_never_compress(node: &NodeSnapshot, config: &CompressionConfig, now: DateTime<Utc>) -> bool {
    let rules = &config.never_compress;
    if rules.pinned && node.pinned {
        return true;
    }
    if rules.starred && node.starred {
        return true;
    }
    days_between(node.created_at, now) < rules.age_days_less_than
}

pub fn meets_compression_requirements(
    node: &NodeSnapshot,
    strong_active_edges: usize,
    config: &CompressionConfig,
    now: DateTime<Utc>,
) -> bool {
    let req = &config.candidate_requirements;
    if node.lifecycle != req.lifecycle {
        return false;
    }
    let Some(dormant_since) = node.dormant_since else {
        return false;
    };
    days_between(dormant_since, now) >= req.dormant_days_minimum
        && node.importance_score <= req.importance_max
        && strong_active_edges <= req.strong_active_edges_max
}

/// Eligible: not protected, and meets every requirement.
pub fn is_compression_candidate(
    node: &NodeSnapshot,
    strong_active_edges: usize,
    config: &CompressionConfig,
    now: DateTime<Utc>,
) -> bool {
    !is_never_compress(node, config, now)
        && meets_compression_requirements(node, strong_active_edges, config, now)
}

/// Strong (effective weight at the threshold or above) and co-activated
/// within the active window.
pub fn is_strong_active_edge(edge: &WeightedEdge, config: &CompressionConfig, now: DateTime<Utc>) -> bool {
    let req = &config.candidate_requirements;
    edge.effective_weight() >= req.strong_edge_min_weight
        && days_between(edge.edge.neural.last_co_activation, now) < req.active_window_days
}

pub fn count_strong_active_edges<'a>(
    node: &NodeId,
    edges: impl IntoIterator<Item = &'a WeightedEdge>,
    config: &CompressionConfig,
    now: DateTime<Utc>,
) -> usize {
    edges
        .into_iter()
        .filter(|e| e.touches(node) && is_strong_active_edge(e, config, now))
        .count()
}
