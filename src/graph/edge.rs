//! Edge representation with a decomposed, self-reinforcing weight
//!
//! `NousEdge` is the persisted relationship shape shared with the rest of
//! the system. `WeightedEdge` extends it with the weight decomposition and
//! the Hebbian bookkeeping this engine maintains.

use super::node::NodeId;
use super::provisional::ProvisionalEdgeState;
use super::weight::{calculate_effective_weight, EffectiveWeightResult, WeightComponents};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every edge id.
pub const EDGE_ID_PREFIX: &str = "e_";
/// Length of the random part of edge and summary ids.
pub const ID_SUFFIX_LEN: usize = 12;

const ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Twelve characters from `[A-Za-z0-9_-]`.
pub(crate) fn random_id_suffix() -> String {
    let bytes = Uuid::new_v4().into_bytes();
    // bytes 6 and 8 carry the UUID version and variant bits
    [0usize, 1, 2, 3, 4, 5, 7, 9, 10, 11, 12, 13]
        .iter()
        .map(|&i| ID_ALPHABET[(bytes[i] & 0x3f) as usize] as char)
        .collect()
}

/// True if `id` is `prefix` followed by exactly twelve id characters.
pub(crate) fn has_id_shape(id: &str, prefix: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(suffix) => {
            suffix.chars().count() == ID_SUFFIX_LEN
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        }
        None => false,
    }
}

/// Unique identifier for an edge, `e_` plus twelve random characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Create a new random EdgeId
    pub fn new() -> Self {
        Self(format!("{}{}", EDGE_ID_PREFIX, random_id_suffix()))
    }

    /// Wrap an existing id without checking its shape
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Matches `^e_[a-zA-Z0-9_-]{12}$`
    pub fn is_well_formed(&self) -> bool {
        has_id_shape(&self.0, EDGE_ID_PREFIX)
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Relationship type.
///
/// The first nine variants are the core set a `NousEdge` may carry; the
/// remaining seven only appear on `WeightedEdge`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    RelatesTo,
    PartOf,
    MentionedIn,
    Causes,
    Precedes,
    Contradicts,
    Supersedes,
    DerivedFrom,
    SimilarTo,
    // extended set
    CausedBy,
    UserLinked,
    TemporalAdjacent,
    TemporalContinuation,
    CoActivated,
    Summarizes,
    ExampleOf,
}

impl EdgeType {
    /// The nine core types.
    pub const CORE: [EdgeType; 9] = [
        Self::RelatesTo,
        Self::PartOf,
        Self::MentionedIn,
        Self::Causes,
        Self::Precedes,
        Self::Contradicts,
        Self::Supersedes,
        Self::DerivedFrom,
        Self::SimilarTo,
    ];

    /// Types a user may create directly.
    pub const USER_CREATABLE: [EdgeType; 7] = [
        Self::UserLinked,
        Self::RelatesTo,
        Self::PartOf,
        Self::CausedBy,
        Self::Contradicts,
        Self::Supersedes,
        Self::DerivedFrom,
    ];

    /// All sixteen types.
    pub fn all() -> [EdgeType; 16] {
        [
            Self::RelatesTo,
            Self::PartOf,
            Self::MentionedIn,
            Self::Causes,
            Self::Precedes,
            Self::Contradicts,
            Self::Supersedes,
            Self::DerivedFrom,
            Self::SimilarTo,
            Self::CausedBy,
            Self::UserLinked,
            Self::TemporalAdjacent,
            Self::TemporalContinuation,
            Self::CoActivated,
            Self::Summarizes,
            Self::ExampleOf,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RelatesTo => "relates_to",
            Self::PartOf => "part_of",
            Self::MentionedIn => "mentioned_in",
            Self::Causes => "causes",
            Self::Precedes => "precedes",
            Self::Contradicts => "contradicts",
            Self::Supersedes => "supersedes",
            Self::DerivedFrom => "derived_from",
            Self::SimilarTo => "similar_to",
            Self::CausedBy => "caused_by",
            Self::UserLinked => "user_linked",
            Self::TemporalAdjacent => "temporal_adjacent",
            Self::TemporalContinuation => "temporal_continuation",
            Self::CoActivated => "co_activated",
            Self::Summarizes => "summarizes",
            Self::ExampleOf => "example_of",
        }
    }

    /// Parse a snake_case type name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|t| t.as_str() == name)
    }

    pub fn is_core(&self) -> bool {
        Self::CORE.contains(self)
    }

    pub fn is_user_creatable(&self) -> bool {
        Self::USER_CREATABLE.contains(self)
    }
}

impl std::fmt::Display for EdgeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether an edge is trusted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStatus {
    Confirmed,
    Provisional,
}

/// Which signal created an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationSource {
    Extraction,
    Similarity,
    User,
    Temporal,
    Coactivation,
    Compression,
}

/// Hebbian bookkeeping carried on every edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuralState {
    pub co_activation_count: u64,
    pub last_co_activation: DateTime<Utc>,
    /// Cumulative time-decay factor applied since the last co-activation, in [0, 1]
    pub decay_factor: f64,
}

impl NeuralState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            co_activation_count: 0,
            last_co_activation: now,
            decay_factor: 1.0,
        }
    }
}

/// Where an edge came from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeProvenance {
    pub source_type: CreationSource,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraction_confidence: Option<f64>,
}

/// The persisted relationship record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NousEdge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// Effective weight, in [0, 1]
    pub strength: f64,
    /// Confidence in the relationship, in [0, 1]
    pub confidence: f64,
    pub neural: NeuralState,
    pub provenance: EdgeProvenance,
}

/// A `NousEdge` with weight decomposition and learning state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightedEdge {
    #[serde(flatten)]
    pub edge: NousEdge,
    pub status: EdgeStatus,
    pub components: WeightComponents,
    pub creation_source: CreationSource,
    #[serde(default)]
    pub consecutive_ignored: u32,
    #[serde(default)]
    pub activation_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provisional: Option<ProvisionalEdgeState>,
}

impl WeightedEdge {
    pub fn id(&self) -> &EdgeId {
        &self.edge.id
    }

    pub fn source(&self) -> &NodeId {
        &self.edge.source
    }

    pub fn target(&self) -> &NodeId {
        &self.edge.target
    }

    pub fn edge_type(&self) -> EdgeType {
        self.edge.edge_type
    }

    pub fn is_provisional(&self) -> bool {
        self.status == EdgeStatus::Provisional
    }

    pub fn effective(&self) -> EffectiveWeightResult {
        calculate_effective_weight(&self.components)
    }

    pub fn effective_weight(&self) -> f64 {
        self.effective().effective_weight
    }

    /// Replace the components and keep `strength` in step with them.
    pub fn with_components(mut self, components: WeightComponents) -> Self {
        self.components = components;
        self.edge.strength = self.effective_weight();
        self
    }

    /// True if the edge touches the node at either end.
    pub fn touches(&self, node: &NodeId) -> bool {
        &self.edge.source == node || &self.edge.target == node
    }
}
