//! Time-based decay of the co-activation bonus
//!
//! After a grace period without co-activation, the bonus shrinks by a fixed
//! factor per elapsed period. `neural.decay_factor` holds the cumulative
//! factor already applied since the last co-activation, so re-running the
//! sweep with the same `now` changes nothing and later sweeps only apply
//! the difference.

use crate::clock::days_between;
use crate::config::TimeDecayConfig;
use crate::graph::{decay_coactivation_bonus, WeightedEdge, EFFECTIVE_WEIGHT_MIN};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of [`apply_time_decay`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayResult {
    pub edge: WeightedEdge,
    pub decay_applied: bool,
    pub days_elapsed: f64,
    pub periods: u32,
    /// Cumulative factor for the elapsed periods (`factor_per_period ^ periods`)
    pub factor: f64,
    pub previous_bonus: f64,
    pub new_bonus: f64,
}

/// Whole decay periods elapsed past the grace period.
pub fn decay_periods(days_elapsed: f64, config: &TimeDecayConfig) -> u32 {
    if days_elapsed < config.grace_days {
        return 0;
    }
    ((days_elapsed - config.grace_days) / config.period_days).floor() as u32
}

pub fn apply_time_decay(edge: WeightedEdge, config: &TimeDecayConfig, now: DateTime<Utc>) -> DecayResult {
    let days_elapsed = days_between(edge.edge.neural.last_co_activation, now);
    let periods = decay_periods(days_elapsed, config);
    let previous_bonus = edge.components.coactivation_bonus;
    let factor = config.factor_per_period.powi(periods as i32);
    let already_applied = edge.edge.neural.decay_factor.clamp(0.0, 1.0);

    if periods == 0 || factor >= already_applied {
        return DecayResult {
            edge,
            decay_applied: false,
            days_elapsed,
            periods,
            factor,
            previous_bonus,
            new_bonus: previous_bonus,
        };
    }

    let step = if already_applied > 0.0 {
        factor / already_applied
    } else {
        0.0
    };
    let components = decay_coactivation_bonus(&edge.components, step);
    let mut edge = edge.with_components(components);
    edge.edge.neural.decay_factor = factor;
    let new_bonus = edge.components.coactivation_bonus;

    tracing::debug!(
        edge = %edge.id(),
        days_elapsed,
        periods,
        previous_bonus,
        new_bonus,
        "time decay applied"
    );

    DecayResult {
        edge,
        decay_applied: true,
        days_elapsed,
        periods,
        factor,
        previous_bonus,
        new_bonus,
    }
}

/// Dead: sitting on the weight floor with no bonus left to recover from.
pub fn is_edge_dead(edge: &WeightedEdge) -> bool {
    edge.effective_weight() <= EFFECTIVE_WEIGHT_MIN && edge.components.coactivation_bonus <= 0.0
}
