//! Schema validation at the engine's data-entry points
//!
//! Three flavours per record type:
//! - `validate_*` returns the first violation as a [`SchemaError`]
//! - `is_valid_*` / `safe_parse_*` never fail, returning `false` / `None`
//! - `parse_*` deserializes JSON and validates, failing fast

use crate::consolidation::{CompressedEdgeRecord, SummaryNode, SUMMARY_TITLE_MAX_CHARS};
use crate::graph::{
    EdgeStatus, NousEdge, WeightComponents, WeightedEdge, COACTIVATION_BONUS_MAX, LEARNED_ADJUSTMENT_LIMIT,
};
use crate::session::Session;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A record that does not satisfy the storage schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed id: {0}")]
    InvalidId(String),

    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("edge type {0} is not allowed here")]
    DisallowedType(String),

    #[error("inconsistent record: {0}")]
    Inconsistent(String),

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type SchemaResult<T> = Result<T, SchemaError>;

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> SchemaResult<()> {
    // NaN fails both comparisons
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(SchemaError::OutOfRange { field, value, min, max })
    }
}

fn check_unit(field: &'static str, value: f64) -> SchemaResult<()> {
    check_range(field, value, 0.0, 1.0)
}

fn check_not_empty(field: &'static str, value: &str) -> SchemaResult<()> {
    if value.is_empty() {
        Err(SchemaError::Empty { field })
    } else {
        Ok(())
    }
}

fn check_edge_body(edge: &NousEdge) -> SchemaResult<()> {
    if !edge.id.is_well_formed() {
        return Err(SchemaError::InvalidId(edge.id.to_string()));
    }
    check_not_empty("source", edge.source.as_str())?;
    check_not_empty("target", edge.target.as_str())?;
    check_unit("strength", edge.strength)?;
    check_unit("confidence", edge.confidence)?;
    check_unit("neural.decay_factor", edge.neural.decay_factor)?;
    if let Some(confidence) = edge.provenance.extraction_confidence {
        check_unit("provenance.extraction_confidence", confidence)?;
    }
    Ok(())
}

/// A persisted edge, restricted to the core relationship types.
pub fn validate_nous_edge(edge: &NousEdge) -> SchemaResult<()> {
    check_edge_body(edge)?;
    if !edge.edge_type.is_core() {
        return Err(SchemaError::DisallowedType(edge.edge_type.to_string()));
    }
    Ok(())
}

pub fn validate_weight_components(components: &WeightComponents) -> SchemaResult<()> {
    check_unit("components.base_weight", components.base_weight)?;
    check_range(
        "components.learned_adjustment",
        components.learned_adjustment,
        -LEARNED_ADJUSTMENT_LIMIT,
        LEARNED_ADJUSTMENT_LIMIT,
    )?;
    check_range(
        "components.coactivation_bonus",
        components.coactivation_bonus,
        0.0,
        COACTIVATION_BONUS_MAX,
    )
}

pub fn validate_weighted_edge(edge: &WeightedEdge) -> SchemaResult<()> {
    check_edge_body(&edge.edge)?;
    validate_weight_components(&edge.components)?;

    if edge.edge.provenance.source_type != edge.creation_source {
        return Err(SchemaError::Inconsistent(format!(
            "provenance source {:?} differs from creation source {:?}",
            edge.edge.provenance.source_type, edge.creation_source
        )));
    }
    match (edge.status, &edge.provisional) {
        (EdgeStatus::Provisional, None) => Err(SchemaError::Inconsistent(
            "provisional edge has no provisional state".into(),
        )),
        (EdgeStatus::Confirmed, Some(_)) => Err(SchemaError::Inconsistent(
            "confirmed edge still carries provisional state".into(),
        )),
        (_, Some(state)) if state.expires_at < state.created_at => Err(SchemaError::Inconsistent(
            "provisional state expires before it was created".into(),
        )),
        _ => Ok(()),
    }
}

pub fn validate_session(session: &Session) -> SchemaResult<()> {
    if session.end < session.start {
        return Err(SchemaError::Inconsistent(format!(
            "session {} ends before it starts",
            session.id
        )));
    }
    for access in &session.accessed_nodes {
        check_not_empty("accessed_nodes.node_id", access.node_id.as_str())?;
        if access.accessed_at < session.start || access.accessed_at > session.end {
            return Err(SchemaError::Inconsistent(format!(
                "access to {} at {} is outside session bounds",
                access.node_id, access.accessed_at
            )));
        }
    }
    Ok(())
}

pub fn validate_compressed_edge_record(record: &CompressedEdgeRecord) -> SchemaResult<()> {
    if !record.edge_id.is_well_formed() {
        return Err(SchemaError::InvalidId(record.edge_id.to_string()));
    }
    check_unit("compressed_edges.weight", record.weight)
}

pub fn validate_summary_node(summary: &SummaryNode) -> SchemaResult<()> {
    if !summary.id.is_well_formed() {
        return Err(SchemaError::InvalidId(summary.id.to_string()));
    }
    let title_len = summary.content.title.chars().count();
    if title_len > SUMMARY_TITLE_MAX_CHARS {
        return Err(SchemaError::Inconsistent(format!(
            "title is {title_len} characters, limit is {SUMMARY_TITLE_MAX_CHARS}"
        )));
    }
    if summary.compressed_from.is_empty() {
        return Err(SchemaError::Empty { field: "compressed_from" });
    }
    check_not_empty("cluster_id", &summary.cluster_id)?;
    if let Some(span) = &summary.content.temporal_span {
        if span.end < span.start {
            return Err(SchemaError::Inconsistent("temporal span ends before it starts".into()));
        }
    }
    summary
        .compressed_edges
        .iter()
        .try_for_each(validate_compressed_edge_record)
}

pub fn is_valid_nous_edge(edge: &NousEdge) -> bool {
    validate_nous_edge(edge).is_ok()
}

pub fn is_valid_weighted_edge(edge: &WeightedEdge) -> bool {
    validate_weighted_edge(edge).is_ok()
}

pub fn is_valid_session(session: &Session) -> bool {
    validate_session(session).is_ok()
}

pub fn is_valid_summary_node(summary: &SummaryNode) -> bool {
    validate_summary_node(summary).is_ok()
}

fn parse_with<T: DeserializeOwned>(json: &str, validate: fn(&T) -> SchemaResult<()>) -> SchemaResult<T> {
    let value: T = serde_json::from_str(json)?;
    validate(&value)?;
    Ok(value)
}

pub fn parse_nous_edge(json: &str) -> SchemaResult<NousEdge> {
    parse_with(json, validate_nous_edge)
}

pub fn parse_weighted_edge(json: &str) -> SchemaResult<WeightedEdge> {
    parse_with(json, validate_weighted_edge)
}

pub fn parse_session(json: &str) -> SchemaResult<Session> {
    parse_with(json, validate_session)
}

pub fn parse_summary_node(json: &str) -> SchemaResult<SummaryNode> {
    parse_with(json, validate_summary_node)
}

pub fn safe_parse_nous_edge(json: &str) -> Option<NousEdge> {
    parse_nous_edge(json).ok()
}

pub fn safe_parse_weighted_edge(json: &str) -> Option<WeightedEdge> {
    parse_weighted_edge(json).ok()
}

pub fn safe_parse_session(json: &str) -> Option<Session> {
    parse_session(json).ok()
}

pub fn safe_parse_summary_node(json: &str) -> Option<SummaryNode> {
    parse_summary_node(json).ok()
}
