//! Builders for edges, sessions and nodes at fixed instants

use chrono::{DateTime, Duration, TimeZone, Utc};
use nous_weights::config::ProvisionalConfig;
use nous_weights::consolidation::CompressionCandidate;
use nous_weights::policy::{build_edge, calculate_user_edge};
use nous_weights::session::{Session, SessionNode};
use nous_weights::{EdgeType, EngineConfig, FixedClock, NodeSnapshot, WeightEngine, WeightedEdge};
use std::sync::Arc;

/// Reference instant all scenarios are measured from.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 6, 9, 0, 0).unwrap()
}

pub fn at_minutes(minutes: i64) -> DateTime<Utc> {
    t0() + Duration::minutes(minutes)
}

/// A session spanning its accesses, each `(node, cluster, minutes after t0)`.
pub fn session(id: &str, accesses: &[(&str, &str, i64)]) -> Session {
    let start = accesses.iter().map(|a| at_minutes(a.2)).min().unwrap_or_else(t0);
    let end = accesses.iter().map(|a| at_minutes(a.2)).max().unwrap_or_else(t0);
    accesses
        .iter()
        .fold(Session::new(id, start, end), |s, (node, cluster, minutes)| {
            s.with_access(SessionNode::new(*node, at_minutes(*minutes)).in_cluster(*cluster))
        })
}

/// A confirmed user edge with the given strength, created at `at`.
pub fn user_edge(from: &str, to: &str, strength: f64, at: DateTime<Utc>) -> WeightedEdge {
    build_edge(
        from.into(),
        to.into(),
        EdgeType::RelatesTo,
        &calculate_user_edge(Some(strength), &Default::default()),
        &ProvisionalConfig::default(),
        at,
    )
}

/// An edge whose base weight is set directly, bypassing the user clamp.
pub fn edge_with_weight(from: &str, to: &str, edge_type: EdgeType, weight: f64, at: DateTime<Utc>) -> WeightedEdge {
    let mut edge = user_edge(from, to, 0.5, at);
    edge.edge.edge_type = edge_type;
    edge.components.base_weight = weight;
    let components = edge.components;
    edge.with_components(components)
}

/// Old, dormant since `dormant_days` before `now`, low importance.
pub fn dormant_node(id: &str, dormant_days: i64, now: DateTime<Utc>) -> NodeSnapshot {
    NodeSnapshot::new(id, now - Duration::days(400))
        .dormant_since(now - Duration::days(dormant_days))
        .with_importance(0.1)
}

pub fn consolidation_candidate(id: &str, cluster: &str, now: DateTime<Utc>) -> CompressionCandidate {
    CompressionCandidate {
        node: dormant_node(id, 90, now),
        cluster_id: cluster.to_string(),
        centroid_similarity: 0.9,
        strong_active_edges: 0,
    }
}

/// Engine on a clock pinned at `now`.
pub fn engine_at(now: DateTime<Utc>) -> (WeightEngine, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::new(now));
    let engine = WeightEngine::with_clock(EngineConfig::default(), clock.clone()).unwrap();
    (engine, clock)
}
