//! Engagement-driven reinforcement
//!
//! Each time an edge is traversed the user either engages with the target
//! or ignores it. Engagement grows the co-activation bonus asymptotically;
//! a run of ignores shaves a fixed amount off it.

use crate::config::{HebbianConfig, ProvisionalConfig};
use crate::graph::{apply_coactivation_bonus, EdgeStatus, WeightedEdge};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What an update did to the edge's weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HebbianAction {
    Strengthened,
    Decayed,
    Unchanged,
}

/// Outcome of [`update_coactivation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoactivationUpdateResult {
    pub edge: WeightedEdge,
    pub action: HebbianAction,
    pub previous_weight: f64,
    pub new_weight: f64,
    /// Human-readable audit note; not for branching on
    pub reason: String,
    /// True if this activation promoted a provisional edge
    pub promoted: bool,
}

pub fn is_engaged(view_duration_seconds: f64, config: &HebbianConfig) -> bool {
    view_duration_seconds >= config.engagement_seconds
}

/// Apply one co-activation observation to an edge.
pub fn update_coactivation(
    mut edge: WeightedEdge,
    view_duration_seconds: f64,
    config: &HebbianConfig,
    provisional: &ProvisionalConfig,
    now: DateTime<Utc>,
) -> CoactivationUpdateResult {
    let previous_weight = edge.effective_weight();

    let (components, action, reason) = if is_engaged(view_duration_seconds, config) {
        edge.consecutive_ignored = 0;
        let delta = config.strengthen_delta * (1.0 - previous_weight);
        (
            apply_coactivation_bonus(&edge.components, delta),
            HebbianAction::Strengthened,
            format!("engaged for {view_duration_seconds:.1}s, bonus +{delta:.4}"),
        )
    } else {
        edge.consecutive_ignored += 1;
        if edge.consecutive_ignored >= config.consecutive_ignores_before_decay {
            let ignored = edge.consecutive_ignored;
            edge.consecutive_ignored = 0;
            (
                apply_coactivation_bonus(&edge.components, -config.ignore_decay_delta),
                HebbianAction::Decayed,
                format!(
                    "ignored {ignored} times in a row, bonus -{:.4}",
                    config.ignore_decay_delta
                ),
            )
        } else {
            (
                edge.components,
                HebbianAction::Unchanged,
                format!(
                    "ignored {}/{} times, no weight change",
                    edge.consecutive_ignored, config.consecutive_ignores_before_decay
                ),
            )
        }
    };

    edge.activation_count += 1;
    edge.edge.neural.co_activation_count += 1;
    edge.edge.neural.last_co_activation = now;
    edge.edge.neural.decay_factor = 1.0;

    let mut promoted = false;
    if let Some(state) = edge.provisional.take() {
        let state = state.record_activation();
        if edge.status == EdgeStatus::Provisional && state.should_promote(provisional.promotion_activations) {
            edge.status = EdgeStatus::Confirmed;
            promoted = true;
            tracing::info!(edge = %edge.id(), activations = state.activation_count, "provisional edge promoted");
        } else {
            edge.provisional = Some(state);
        }
    }

    let edge = edge.with_components(components);
    let effective = edge.effective();
    if effective.was_clamped {
        tracing::warn!(
            edge = %edge.id(),
            raw = effective.raw_value,
            effective = effective.effective_weight,
            "effective weight clamped after co-activation"
        );
    }

    CoactivationUpdateResult {
        new_weight: effective.effective_weight,
        edge,
        action,
        previous_weight,
        reason,
        promoted,
    }
}
