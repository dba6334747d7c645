//! Edges proposed by LLM extraction
//!
//! Confidence picks the tier: confirmed at full weight, provisional at a
//! reduced weight, or no edge at all.

use super::PolicyOutcome;
use crate::config::{EdgeTypeWeights, ExtractionConfig};
use crate::graph::{CreationSource, EdgeStatus, EdgeType};

/// Base weight for a type: the table's entry, or the unknown-type default.
pub fn base_weight_for(edge_type: EdgeType, weights: &EdgeTypeWeights, config: &ExtractionConfig) -> f64 {
    weights.get(edge_type).unwrap_or(config.unknown_type_weight)
}

pub fn calculate_extraction_edge(
    edge_type: EdgeType,
    llm_confidence: f64,
    weights: &EdgeTypeWeights,
    config: &ExtractionConfig,
) -> Option<PolicyOutcome> {
    let confidence = llm_confidence.clamp(0.0, 1.0);
    if confidence != llm_confidence {
        tracing::warn!(llm_confidence, "extraction confidence outside [0, 1], clamped");
    }
    let base = base_weight_for(edge_type, weights, config);

    let (status, weight) = if confidence >= config.confirmed_threshold {
        (EdgeStatus::Confirmed, base * confidence)
    } else if confidence >= config.provisional_threshold {
        (EdgeStatus::Provisional, base * confidence * config.provisional_factor)
    } else {
        tracing::debug!(edge_type = %edge_type, confidence, "extraction below provisional threshold");
        return None;
    };

    Some(PolicyOutcome {
        weight,
        status,
        confidence,
        source: CreationSource::Extraction,
        extraction_confidence: Some(confidence),
    })
}
