//! Three-part edge weight: base, learned adjustment, co-activation bonus
//!
//! `effective = clamp(base * (1 + learned) + bonus, 0.10, 1.00)`
//!
//! All updates are total functions over the declared ranges. Out-of-range
//! results are clamped, never rejected; the effective-weight computation
//! reports whether the clamp changed the raw value.

use serde::{Deserialize, Serialize};

/// Lower bound of an effective weight. Edges sitting here with no bonus are dead.
pub const EFFECTIVE_WEIGHT_MIN: f64 = 0.10;
/// Upper bound of an effective weight.
pub const EFFECTIVE_WEIGHT_MAX: f64 = 1.00;
/// `learned_adjustment` lives in `[-LIMIT, LIMIT]`.
pub const LEARNED_ADJUSTMENT_LIMIT: f64 = 0.30;
/// `coactivation_bonus` lives in `[0, MAX]`.
pub const COACTIVATION_BONUS_MAX: f64 = 0.30;

/// Decomposed edge weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightComponents {
    /// Nominal weight from the creation-source policy, in [0, 1]
    pub base_weight: f64,
    /// Slow-moving learned correction, in [-0.3, 0.3]
    pub learned_adjustment: f64,
    /// Hebbian co-activation bonus, in [0, 0.3]
    pub coactivation_bonus: f64,
}

/// Outcome of [`calculate_effective_weight`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectiveWeightResult {
    pub effective_weight: f64,
    /// True when clamping altered `raw_value`
    pub was_clamped: bool,
    pub raw_value: f64,
}

/// Wrap a policy weight: no learned adjustment, no bonus.
pub fn create_weight_components(base_weight: f64) -> WeightComponents {
    WeightComponents {
        base_weight: base_weight.clamp(0.0, 1.0),
        learned_adjustment: 0.0,
        coactivation_bonus: 0.0,
    }
}

pub fn calculate_effective_weight(components: &WeightComponents) -> EffectiveWeightResult {
    let raw_value = components.base_weight * (1.0 + components.learned_adjustment)
        + components.coactivation_bonus;
    let effective_weight = raw_value.clamp(EFFECTIVE_WEIGHT_MIN, EFFECTIVE_WEIGHT_MAX);
    EffectiveWeightResult {
        effective_weight,
        was_clamped: effective_weight != raw_value,
        raw_value,
    }
}

pub fn apply_learning_adjustment(components: &WeightComponents, delta: f64) -> WeightComponents {
    WeightComponents {
        learned_adjustment: (components.learned_adjustment + delta)
            .clamp(-LEARNED_ADJUSTMENT_LIMIT, LEARNED_ADJUSTMENT_LIMIT),
        ..*components
    }
}

pub fn apply_coactivation_bonus(components: &WeightComponents, delta: f64) -> WeightComponents {
    WeightComponents {
        coactivation_bonus: (components.coactivation_bonus + delta)
            .clamp(0.0, COACTIVATION_BONUS_MAX),
        ..*components
    }
}

/// Scale the bonus by `factor` (taken within [0, 1]); never goes below zero.
pub fn decay_coactivation_bonus(components: &WeightComponents, factor: f64) -> WeightComponents {
    let factor = factor.clamp(0.0, 1.0);
    WeightComponents {
        coactivation_bonus: (components.coactivation_bonus * factor).max(0.0),
        ..*components
    }
}

impl WeightComponents {
    /// Shorthand for `calculate_effective_weight(self).effective_weight`.
    pub fn effective_weight(&self) -> f64 {
        calculate_effective_weight(self).effective_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn components(base: f64, learned: f64, bonus: f64) -> WeightComponents {
        WeightComponents {
            base_weight: base,
            learned_adjustment: learned,
            coactivation_bonus: bonus,
        }
    }

    #[test]
    fn effective_weight_combines_components() {
        let result = calculate_effective_weight(&components(0.5, 0.2, 0.1));
        assert!((result.raw_value - 0.7).abs() < 1e-12);
        assert!((result.effective_weight - 0.7).abs() < 1e-12);
        assert!(!result.was_clamped);
    }

    #[test]
    fn clamps_high_and_reports_it() {
        let result = calculate_effective_weight(&components(0.95, 0.3, 0.3));
        assert_eq!(result.effective_weight, EFFECTIVE_WEIGHT_MAX);
        assert!(result.was_clamped);
        assert!(result.raw_value > 1.0);
    }

    #[test]
    fn clamps_low_and_reports_it() {
        let result = calculate_effective_weight(&components(0.05, -0.3, 0.0));
        assert_eq!(result.effective_weight, EFFECTIVE_WEIGHT_MIN);
        assert!(result.was_clamped);
    }

    #[test]
    fn fresh_components_match_base() {
        let c = create_weight_components(0.42);
        let result = calculate_effective_weight(&c);
        assert_eq!(result.effective_weight, 0.42);
        assert!(!result.was_clamped);
    }

    #[test]
    fn learning_adjustment_saturates() {
        let c = apply_learning_adjustment(&components(0.5, 0.25, 0.0), 0.2);
        assert_eq!(c.learned_adjustment, LEARNED_ADJUSTMENT_LIMIT);

        let c = apply_learning_adjustment(&c, -1.0);
        assert_eq!(c.learned_adjustment, -LEARNED_ADJUSTMENT_LIMIT);
    }

    #[test]
    fn zero_bonus_is_identity() {
        let c = components(0.6, -0.1, 0.12);
        assert_eq!(apply_coactivation_bonus(&c, 0.0), c);
    }

    #[test]
    fn bonus_stays_in_range() {
        let c = apply_coactivation_bonus(&components(0.6, 0.0, 0.25), 0.2);
        assert_eq!(c.coactivation_bonus, COACTIVATION_BONUS_MAX);

        let c = apply_coactivation_bonus(&c, -1.0);
        assert_eq!(c.coactivation_bonus, 0.0);
    }

    #[test]
    fn decay_never_increases_bonus() {
        let c = components(0.6, 0.0, 0.2);
        for factor in [0.0, 0.25, 0.5, 0.95, 0.999] {
            assert!(decay_coactivation_bonus(&c, factor).coactivation_bonus <= c.coactivation_bonus);
        }
        assert_eq!(decay_coactivation_bonus(&c, 0.0).coactivation_bonus, 0.0);
    }
}
