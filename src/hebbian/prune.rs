//! Pruning classification
//!
//! The engine never deletes edges. It tells the caller which ones a sweep
//! may remove.

use super::decay::is_edge_dead;
use crate::config::ProvisionalConfig;
use crate::graph::{EdgeId, EdgeStatus, WeightedEdge};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDisposition {
    Live,
    Dead,
    ExpiredProvisional,
}

pub fn is_provisional_expired(edge: &WeightedEdge, config: &ProvisionalConfig, now: DateTime<Utc>) -> bool {
    edge.status == EdgeStatus::Provisional
        && edge
            .provisional
            .map(|p| p.is_expired(now, config.promotion_activations))
            .unwrap_or(false)
}

/// Provisional edges still inside their time-to-live are live even on the
/// weight floor; they are waiting for activations, not dying.
pub fn classify_edge(edge: &WeightedEdge, config: &ProvisionalConfig, now: DateTime<Utc>) -> EdgeDisposition {
    if is_provisional_expired(edge, config, now) {
        EdgeDisposition::ExpiredProvisional
    } else if !edge.is_provisional() && is_edge_dead(edge) {
        EdgeDisposition::Dead
    } else {
        EdgeDisposition::Live
    }
}

/// Ids of every edge that is not live, with the reason.
pub fn prune_candidates<'a>(
    edges: impl IntoIterator<Item = &'a WeightedEdge>,
    config: &ProvisionalConfig,
    now: DateTime<Utc>,
) -> Vec<(EdgeId, EdgeDisposition)> {
    edges
        .into_iter()
        .filter_map(|edge| match classify_edge(edge, config, now) {
            EdgeDisposition::Live => None,
            disposition => Some((edge.id().clone(), disposition)),
        })
        .collect()
}
