//! Summary nodes and compressed-edge records

use crate::graph::{
    has_id_shape, random_id_suffix, CreationSource, EdgeId, EdgeType, NodeId, WeightedEdge,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix of every summary node id.
pub const SUMMARY_ID_PREFIX: &str = "sum_";
/// Longest title a summary may carry, in characters.
pub const SUMMARY_TITLE_MAX_CHARS: usize = 60;

/// Identifier of a summary node, `sum_` plus twelve random characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryId(String);

impl SummaryId {
    pub fn new() -> Self {
        Self(format!("{}{}", SUMMARY_ID_PREFIX, random_id_suffix()))
    }

    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_well_formed(&self) -> bool {
        has_id_shape(&self.0, SUMMARY_ID_PREFIX)
    }

    /// The summary as a graph node.
    pub fn as_node_id(&self) -> NodeId {
        NodeId::from_string(self.0.clone())
    }
}

impl Default for SummaryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SummaryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalSpan {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub preserved_entities: Vec<String>,
    #[serde(default)]
    pub key_facts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal_span: Option<TemporalSpan>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryKind {
    Summary,
}

/// An original edge as it stood when its endpoint was compressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressedEdgeRecord {
    pub edge_id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(rename = "type")]
    pub edge_type: EdgeType,
    /// Effective weight at compression time
    pub weight: f64,
    pub creation_source: CreationSource,
}

/// A lossy merge of several dormant nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryNode {
    pub id: SummaryId,
    #[serde(rename = "type")]
    pub kind: SummaryKind,
    pub content: SummaryContent,
    pub compressed_from: Vec<NodeId>,
    pub compressed_edges: Vec<CompressedEdgeRecord>,
    pub cluster_id: String,
    pub created_at: DateTime<Utc>,
}

pub fn create_edge_record(edge: &WeightedEdge) -> CompressedEdgeRecord {
    CompressedEdgeRecord {
        edge_id: edge.id().clone(),
        source: edge.source().clone(),
        target: edge.target().clone(),
        edge_type: edge.edge_type(),
        weight: edge.effective_weight(),
        creation_source: edge.creation_source,
    }
}

/// The strongest original weight, kept only if it reaches `min_weight`.
/// Weaker groups are dropped rather than preserved through compression.
pub fn calculate_aggregated_weight(weights: impl IntoIterator<Item = f64>, min_weight: f64) -> Option<f64> {
    let max = weights.into_iter().fold(None, |acc: Option<f64>, w| match acc {
        Some(m) if m >= w => Some(m),
        _ => Some(w),
    })?;
    (max >= min_weight).then_some(max)
}

/// Truncate to the title limit on a character boundary.
pub fn truncate_title(title: &str) -> String {
    title.chars().take(SUMMARY_TITLE_MAX_CHARS).collect()
}

pub fn create_summary_node(
    content: SummaryContent,
    compressed_from: Vec<NodeId>,
    compressed_edges: Vec<CompressedEdgeRecord>,
    cluster_id: impl Into<String>,
    now: DateTime<Utc>,
) -> SummaryNode {
    SummaryNode {
        id: SummaryId::new(),
        kind: SummaryKind::Summary,
        content: SummaryContent {
            title: truncate_title(&content.title),
            ..content
        },
        compressed_from,
        compressed_edges,
        cluster_id: cluster_id.into(),
        created_at: now,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn aggregate_discards_weak_groups() {
        assert_eq!(calculate_aggregated_weight([0.3, 0.4], 0.5), None);
        assert_eq!(calculate_aggregated_weight([0.3, 0.6], 0.5), Some(0.6));
        assert_eq!(calculate_aggregated_weight([0.5], 0.5), Some(0.5));
        assert_eq!(calculate_aggregated_weight(Vec::<f64>::new(), 0.5), None);
    }

    #[test]
    fn summary_ids_are_well_formed() {
        let id = SummaryId::new();
        assert!(id.is_well_formed(), "{id}");
        assert!(!SummaryId::from_string("e_abcdefghijkl").is_well_formed());
    }

    #[test]
    fn long_titles_are_truncated_by_character() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let title = "é".repeat(80);
        let summary = create_summary_node(
            SummaryContent {
                title,
                body: "body".into(),
                ..Default::default()
            },
            vec!["a".into(), "b".into()],
            Vec::new(),
            "cluster-1",
            now,
        );
        assert_eq!(summary.content.title.chars().count(), SUMMARY_TITLE_MAX_CHARS);
        assert_eq!(summary.kind, SummaryKind::Summary);
        assert_eq!(summary.created_at, now);
    }

    #[test]
    fn summary_serializes_type_field() {
        let now = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
        let summary = create_summary_node(SummaryContent::default(), vec!["a".into()], Vec::new(), "c", now);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["type"], "summary");
        assert!(json["id"].as_str().unwrap().starts_with("sum_"));
    }
}
