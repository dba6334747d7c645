//! Temporal edge inference over session logs

use super::{Session, SessionNode};
use crate::clock::minutes_between;
use crate::config::{ProvisionalConfig, SessionConfig, TemporalConfig};
use crate::graph::{EdgeType, NodeId, WeightedEdge};
use crate::policy::{build_edge, calculate_temporal_edge, continuation_outcome, PolicyOutcome};
use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeSet, HashMap};

/// Whether two sessions qualify for continuation edges, and why.
#[derive(Debug, Clone, PartialEq)]
pub struct ContinuationEligibility {
    pub eligible: bool,
    /// `current.start - previous.end`
    pub gap: Duration,
    pub shared_clusters: BTreeSet<String>,
}

/// True once the last access is at least a session timeout in the past.
pub fn has_session_ended(last_access: DateTime<Utc>, now: DateTime<Utc>, config: &SessionConfig) -> bool {
    now - last_access >= config.timeout()
}

/// Collects edges keyed by (source, target), keeping the heaviest per pair
/// and the order in which pairs were first seen.
struct EdgeCollector {
    order: Vec<(NodeId, NodeId)>,
    best: HashMap<(NodeId, NodeId), PolicyOutcome>,
}

impl EdgeCollector {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            best: HashMap::new(),
        }
    }

    fn offer(&mut self, source: &NodeId, target: &NodeId, outcome: PolicyOutcome) {
        let key = (source.clone(), target.clone());
        match self.best.get_mut(&key) {
            Some(existing) => {
                if outcome.weight > existing.weight {
                    *existing = outcome;
                }
            }
            None => {
                self.order.push(key.clone());
                self.best.insert(key, outcome);
            }
        }
    }

    fn build(
        self,
        edge_type: EdgeType,
        provisional: &ProvisionalConfig,
        now: DateTime<Utc>,
    ) -> Vec<WeightedEdge> {
        let Self { order, best } = self;
        order
            .into_iter()
            .filter_map(|key| {
                let outcome = best.get(&key)?;
                Some(build_edge(key.0, key.1, edge_type, outcome, provisional, now))
            })
            .collect()
    }
}

/// Link time-adjacent accesses within one session.
///
/// Each qualifying adjacent pair yields a symmetric pair of
/// `temporal_adjacent` edges. Pairs too far apart are skipped, as are
/// repeat accesses of the same node.
pub fn create_session_temporal_edges(
    session: &Session,
    temporal: &TemporalConfig,
    provisional: &ProvisionalConfig,
    now: DateTime<Utc>,
) -> Vec<WeightedEdge> {
    let accesses = session.sorted_accesses();
    let mut collector = EdgeCollector::new();

    for pair in accesses.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        if a.node_id == b.node_id {
            continue;
        }
        let gap = minutes_between(a.accessed_at, b.accessed_at);
        let Some(outcome) = calculate_temporal_edge(gap, temporal) else {
            tracing::debug!(session = %session.id, from = %a.node_id, to = %b.node_id, gap, "gap too large, not linked");
            continue;
        };
        collector.offer(&a.node_id, &b.node_id, outcome);
        collector.offer(&b.node_id, &a.node_id, outcome);
    }

    collector.build(EdgeType::TemporalAdjacent, provisional, now)
}

fn clusters(session: &Session) -> BTreeSet<&str> {
    session
        .accessed_nodes
        .iter()
        .filter_map(|n| n.cluster_id.as_deref())
        .collect()
}

/// Sessions are eligible when the current one starts no more than the
/// configured gap after the previous one ended and they share a cluster.
/// A current session starting before the previous one ended is not a
/// continuation.
pub fn continuation_eligibility(
    current: &Session,
    previous: &Session,
    temporal: &TemporalConfig,
) -> ContinuationEligibility {
    let gap = current.start - previous.end;
    let previous_clusters = clusters(previous);
    let shared_clusters: BTreeSet<String> = clusters(current)
        .intersection(&previous_clusters)
        .map(|c| c.to_string())
        .collect();

    let in_window = gap >= Duration::zero() && gap <= temporal.continuation_max_gap();
    ContinuationEligibility {
        eligible: in_window && !shared_clusters.is_empty(),
        gap,
        shared_clusters,
    }
}

fn nodes_in_cluster<'a>(session: &'a Session, cluster: &'a str) -> impl Iterator<Item = &'a SessionNode> + 'a {
    session
        .accessed_nodes
        .iter()
        .filter(move |n| n.cluster_id.as_deref() == Some(cluster))
}

/// Link nodes of the previous session to nodes of the current one that
/// share a cluster. Ineligible sessions yield no edges.
pub fn detect_continuation_edges(
    current: &Session,
    previous: &Session,
    temporal: &TemporalConfig,
    provisional: &ProvisionalConfig,
    now: DateTime<Utc>,
) -> Vec<WeightedEdge> {
    let eligibility = continuation_eligibility(current, previous, temporal);
    if !eligibility.eligible {
        tracing::debug!(
            current = %current.id,
            previous = %previous.id,
            gap_minutes = eligibility.gap.num_minutes(),
            shared = eligibility.shared_clusters.len(),
            "sessions not eligible for continuation"
        );
        return Vec::new();
    }

    let outcome = continuation_outcome(temporal);
    let mut collector = EdgeCollector::new();
    for cluster in &eligibility.shared_clusters {
        for prev in nodes_in_cluster(previous, cluster) {
            for curr in nodes_in_cluster(current, cluster) {
                if prev.node_id != curr.node_id {
                    collector.offer(&prev.node_id, &curr.node_id, outcome);
                }
            }
        }
    }

    collector.build(EdgeType::TemporalContinuation, provisional, now)
}
