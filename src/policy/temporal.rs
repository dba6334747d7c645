//! Edges from temporal proximity
//!
//! Adjacent accesses within a session are linked with a weight that decays
//! exponentially in the gap, floored, and cut off entirely past a maximum
//! gap. Cross-session continuation edges carry a fixed weight.

use super::PolicyOutcome;
use crate::config::TemporalConfig;
use crate::graph::CreationSource;

/// `max(floor, e^(-gap / decay_minutes))`, or `None` past the gap cap
/// (and for negative gaps).
pub fn calculate_temporal_weight(gap_minutes: f64, config: &TemporalConfig) -> Option<f64> {
    if !(0.0..=config.max_gap_minutes).contains(&gap_minutes) {
        return None;
    }
    Some((-gap_minutes / config.decay_minutes).exp().max(config.weight_floor))
}

pub fn calculate_temporal_edge(gap_minutes: f64, config: &TemporalConfig) -> Option<PolicyOutcome> {
    calculate_temporal_weight(gap_minutes, config)
        .map(|weight| PolicyOutcome::confirmed(weight, 1.0, CreationSource::Temporal))
}

/// Continuation edges are binary: eligible pairs all get the same weight.
pub fn continuation_outcome(config: &TemporalConfig) -> PolicyOutcome {
    PolicyOutcome::confirmed(config.continuation_weight, 1.0, CreationSource::Temporal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight(gap: f64) -> Option<f64> {
        calculate_temporal_weight(gap, &TemporalConfig::default())
    }

    #[test]
    fn zero_gap_is_full_weight() {
        assert_eq!(weight(0.0), Some(1.0));
    }

    #[test]
    fn ten_minutes() {
        let w = weight(10.0).unwrap();
        assert!((w - (-1.0f64 / 3.0).exp()).abs() < 1e-12);
        assert!((w - 0.7165).abs() < 1e-4);
    }

    #[test]
    fn long_gaps_hit_the_floor() {
        // e^-3 ≈ 0.0498
        assert_eq!(weight(90.0), Some(0.20));
        assert_eq!(weight(120.0), Some(0.20));
    }

    #[test]
    fn beyond_cap_is_rejected() {
        assert_eq!(weight(120.01), None);
        assert_eq!(weight(150.0), None);
        assert_eq!(weight(-1.0), None);
    }

    #[test]
    fn continuation_weight_is_fixed() {
        let outcome = continuation_outcome(&TemporalConfig::default());
        assert_eq!(outcome.weight, 0.30);
        assert_eq!(outcome.source, CreationSource::Temporal);
    }
}
