//! Session access logs and temporal-edge inference
//!
//! Working memory hands over a sealed session: an ordered log of node
//! accesses. Inside a session, consecutive accesses close in time are linked
//! both ways with `temporal_adjacent` edges. Across two sessions that resume
//! the same topic cluster within a day, `temporal_continuation` edges run
//! from the earlier session's nodes to the later one's.

mod inference;

pub use inference::{
    continuation_eligibility, create_session_temporal_edges, detect_continuation_edges,
    has_session_ended, ContinuationEligibility,
};

use crate::graph::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One access in a session log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionNode {
    pub node_id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<String>,
    pub accessed_at: DateTime<Utc>,
}

impl SessionNode {
    pub fn new(node_id: impl Into<NodeId>, accessed_at: DateTime<Utc>) -> Self {
        Self {
            node_id: node_id.into(),
            cluster_id: None,
            accessed_at,
        }
    }

    pub fn in_cluster(mut self, cluster_id: impl Into<String>) -> Self {
        self.cluster_id = Some(cluster_id.into());
        self
    }
}

/// A bounded access log. Input only; never persisted by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub accessed_nodes: Vec<SessionNode>,
}

impl Session {
    pub fn new(id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            accessed_nodes: Vec::new(),
        }
    }

    pub fn with_access(mut self, node: SessionNode) -> Self {
        self.accessed_nodes.push(node);
        self
    }

    /// Accesses ordered by time (stable for ties).
    pub fn sorted_accesses(&self) -> Vec<&SessionNode> {
        let mut nodes: Vec<&SessionNode> = self.accessed_nodes.iter().collect();
        nodes.sort_by_key(|n| n.accessed_at);
        nodes
    }

    /// Time of the most recent access, if any.
    pub fn last_access(&self) -> Option<DateTime<Utc>> {
        self.accessed_nodes.iter().map(|n| n.accessed_at).max()
    }
}
