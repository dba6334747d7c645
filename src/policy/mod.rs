//! Creation-source policies
//!
//! Each policy turns one raw signal into an initial weight and status.
//! A threshold miss is an expected outcome, returned as `None`; the caller
//! simply does not create the edge.
//!
//! [`build_edge`] wraps any policy outcome into a fresh `WeightedEdge`
//! whose effective weight equals the policy weight.

pub mod coactivation;
pub mod extraction;
pub mod similarity;
pub mod temporal;
pub mod user;

use crate::config::ProvisionalConfig;
use crate::graph::{
    create_weight_components, calculate_effective_weight, CreationSource, EdgeId, EdgeProvenance,
    EdgeStatus, EdgeType, NeuralState, NodeId, NousEdge, ProvisionalEdgeState, WeightedEdge,
};
use chrono::{DateTime, Utc};

pub use coactivation::{calculate_coactivation_edge, should_consider_new_edge};
pub use extraction::calculate_extraction_edge;
pub use similarity::{calculate_similarity_edge, meets_similarity_threshold, similarity_edge_if_fresh};
pub use temporal::{calculate_temporal_edge, calculate_temporal_weight, continuation_outcome};
pub use user::{calculate_user_edge, resolve_user_strength};

/// What a policy decided for a prospective edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOutcome {
    pub weight: f64,
    pub status: EdgeStatus,
    /// Confidence recorded on the edge
    pub confidence: f64,
    pub source: CreationSource,
    /// Raw LLM confidence, extraction edges only
    pub extraction_confidence: Option<f64>,
}

impl PolicyOutcome {
    pub(crate) fn confirmed(weight: f64, confidence: f64, source: CreationSource) -> Self {
        Self {
            weight,
            status: EdgeStatus::Confirmed,
            confidence,
            source,
            extraction_confidence: None,
        }
    }
}

/// Build a new edge from a policy outcome.
///
/// Provisional outcomes get a `ProvisionalEdgeState` expiring after the
/// configured time-to-live.
pub fn build_edge(
    source: NodeId,
    target: NodeId,
    edge_type: EdgeType,
    outcome: &PolicyOutcome,
    provisional: &ProvisionalConfig,
    now: DateTime<Utc>,
) -> WeightedEdge {
    let components = create_weight_components(outcome.weight);
    let effective = calculate_effective_weight(&components);
    if effective.was_clamped {
        tracing::warn!(
            edge_type = %edge_type,
            raw = effective.raw_value,
            effective = effective.effective_weight,
            "policy weight clamped at creation"
        );
    }

    let provisional_state = match outcome.status {
        EdgeStatus::Provisional => Some(ProvisionalEdgeState::new(now, provisional.ttl())),
        EdgeStatus::Confirmed => None,
    };

    WeightedEdge {
        edge: NousEdge {
            id: EdgeId::new(),
            source,
            target,
            edge_type,
            subtype: None,
            strength: effective.effective_weight,
            confidence: outcome.confidence.clamp(0.0, 1.0),
            neural: NeuralState::new(now),
            provenance: EdgeProvenance {
                source_type: outcome.source,
                created_at: now,
                extraction_confidence: outcome.extraction_confidence,
            },
        },
        status: outcome.status,
        components,
        creation_source: outcome.source,
        consecutive_ignored: 0,
        activation_count: 0,
        provisional: provisional_state,
    }
}
