//! Node-side views the engine reads
//!
//! Nodes are owned by the storage layer. The engine only sees the handful of
//! lifecycle and freshness fields its rules depend on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a node (fact, episode, document or summary).
///
/// Serializes as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a NodeId from a string
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Forgetting-subsystem lifecycle of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    Active,
    Dormant,
    Compressed,
}

/// The fields of a node that compression eligibility depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub starred: bool,
    pub lifecycle: Lifecycle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dormant_since: Option<DateTime<Utc>>,
    /// Importance in [0, 1]
    pub importance_score: f64,
}

impl NodeSnapshot {
    /// An active, unpinned node with neutral importance.
    pub fn new(id: impl Into<NodeId>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            created_at,
            pinned: false,
            starred: false,
            lifecycle: Lifecycle::Active,
            dormant_since: None,
            importance_score: 0.5,
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pinned = true;
        self
    }

    pub fn starred(mut self) -> Self {
        self.starred = true;
        self
    }

    /// Mark the node dormant since the given instant.
    pub fn dormant_since(mut self, since: DateTime<Utc>) -> Self {
        self.lifecycle = Lifecycle::Dormant;
        self.dormant_since = Some(since);
        self
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance_score = importance;
        self
    }
}

/// Embedding bookkeeping supplied by the embeddings subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingFreshnessState {
    pub embedding_version: u32,
    pub last_content_update: DateTime<Utc>,
    pub last_embedding_update: DateTime<Utc>,
}

impl EmbeddingFreshnessState {
    /// An embedding is fresh iff it was computed no earlier than the last
    /// content change.
    pub fn is_fresh(&self) -> bool {
        self.last_embedding_update >= self.last_content_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn node_id_serializes_as_string() {
        let id = NodeId::from_string("fact:espresso");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"fact:espresso\"");
    }

    #[test]
    fn lifecycle_serializes_lowercase() {
        let json = serde_json::to_string(&Lifecycle::Dormant).unwrap();
        assert_eq!(json, "\"dormant\"");
    }

    #[test]
    fn dormant_builder_sets_both_fields() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let node = NodeSnapshot::new("n1", t0).dormant_since(t0 + Duration::days(10));
        assert_eq!(node.lifecycle, Lifecycle::Dormant);
        assert_eq!(node.dormant_since, Some(t0 + Duration::days(10)));
    }

    #[test]
    fn freshness_compares_update_times() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let fresh = EmbeddingFreshnessState {
            embedding_version: 2,
            last_content_update: t0,
            last_embedding_update: t0,
        };
        assert!(fresh.is_fresh());

        let stale = EmbeddingFreshnessState {
            last_content_update: t0 + Duration::minutes(1),
            ..fresh
        };
        assert!(!stale.is_fresh());
    }
}
