//! Hebbian learning over an edge's lifetime
//!
//! Run with: `cargo test --test hebbian_lifecycle`

mod common;

use chrono::Duration;
use common::{t0, user_edge};
use nous_weights::config::{CoactivationConfig, HebbianConfig, ProvisionalConfig, TimeDecayConfig};
use nous_weights::hebbian::{
    apply_time_decay, classify_edge, is_edge_dead, update_coactivation, EdgeDisposition, HebbianAction,
};
use nous_weights::policy::{build_edge, calculate_coactivation_edge};
use nous_weights::{EdgeStatus, EdgeType, WeightedEdge};

fn engage(edge: WeightedEdge, seconds: f64, minutes: i64) -> nous_weights::hebbian::CoactivationUpdateResult {
    update_coactivation(
        edge,
        seconds,
        &HebbianConfig::default(),
        &ProvisionalConfig::default(),
        t0() + Duration::minutes(minutes),
    )
}

// === Scenario 1: engagement strengthens asymptotically ===

#[test]
fn repeated_engagement_has_diminishing_returns() {
    let mut edge = user_edge("a", "b", 0.6, t0());
    let mut increments = Vec::new();

    for minute in 0..10 {
        let result = engage(edge, 30.0, minute);
        assert_eq!(result.action, HebbianAction::Strengthened);
        increments.push(result.new_weight - result.previous_weight);
        edge = result.edge;
    }

    assert!(increments.windows(2).all(|w| w[1] <= w[0] + 1e-12), "{increments:?}");
    assert!(edge.effective_weight() <= 0.9 + 1e-12, "bonus is capped at 0.3");
    assert_eq!(edge.activation_count, 10);
    assert_eq!(edge.edge.neural.co_activation_count, 10);
}

// === Scenario 2: ignores tally, then decay ===

#[test]
fn three_ignores_decay_once_and_reset() {
    let mut edge = user_edge("a", "b", 0.6, t0());
    edge = engage(edge, 10.0, 0).edge;
    let bonus = edge.components.coactivation_bonus;

    let mut actions = Vec::new();
    for minute in 1..=3 {
        let result = engage(edge, 1.0, minute);
        actions.push(result.action);
        edge = result.edge;
    }

    assert_eq!(
        actions,
        [HebbianAction::Unchanged, HebbianAction::Unchanged, HebbianAction::Decayed]
    );
    assert_eq!(edge.consecutive_ignored, 0);
    assert!((edge.components.coactivation_bonus - (bonus - 0.02)).abs() < 1e-12);
}

#[test]
fn engagement_resets_the_ignore_streak() {
    let mut edge = user_edge("a", "b", 0.6, t0());
    edge = engage(edge, 1.0, 0).edge;
    edge = engage(edge, 1.0, 1).edge;
    assert_eq!(edge.consecutive_ignored, 2);

    edge = engage(edge, 5.0, 2).edge;
    assert_eq!(edge.consecutive_ignored, 0);

    let result = engage(edge, 1.0, 3);
    assert_eq!(result.action, HebbianAction::Unchanged);
}

#[test]
fn decay_from_zero_bonus_is_floored() {
    let mut edge = user_edge("a", "b", 0.6, t0());
    for minute in 0..3 {
        edge = engage(edge, 0.0, minute).edge;
    }
    assert_eq!(edge.components.coactivation_bonus, 0.0);
    assert_eq!(edge.effective_weight(), 0.6);
}

// === Scenario 3: provisional promotion ===

#[test]
fn co_activated_edge_is_promoted_on_third_activation() {
    let outcome = calculate_coactivation_edge(0.7, &CoactivationConfig::default()).unwrap();
    let mut edge = build_edge("a".into(), "b".into(), EdgeType::CoActivated, &outcome, &ProvisionalConfig::default(), t0());
    assert_eq!(edge.status, EdgeStatus::Provisional);

    let mut promoted_at = None;
    for minute in 0..3 {
        let result = engage(edge, 1.0, minute);
        if result.promoted {
            promoted_at = Some(minute);
        }
        edge = result.edge;
    }

    assert_eq!(promoted_at, Some(2));
    assert_eq!(edge.status, EdgeStatus::Confirmed);
    assert!(edge.provisional.is_none());
    assert_eq!(
        classify_edge(&edge, &ProvisionalConfig::default(), t0() + Duration::days(60)),
        EdgeDisposition::Live
    );
}

// === Scenario 4: time decay ===

#[test]
fn time_decay_grace_period_and_periods() {
    let config = TimeDecayConfig::default();
    let mut edge = user_edge("a", "b", 0.6, t0());
    edge = engage(edge, 60.0, 0).edge;
    let bonus = edge.components.coactivation_bonus;
    assert!(bonus > 0.0);

    let at = |days| t0() + Duration::days(days);

    assert!(!apply_time_decay(edge.clone(), &config, at(29)).decay_applied);
    assert!(!apply_time_decay(edge.clone(), &config, at(59)).decay_applied, "zero whole periods");

    let result = apply_time_decay(edge.clone(), &config, at(60));
    assert!(result.decay_applied);
    assert_eq!(result.periods, 1);
    assert!((result.new_bonus - bonus * 0.95).abs() < 1e-12);
}

#[test]
fn time_decay_is_idempotent_and_monotonic() {
    let config = TimeDecayConfig::default();
    let edge = engage(user_edge("a", "b", 0.6, t0()), 60.0, 0).edge;
    let bonus = edge.components.coactivation_bonus;
    let at = |days| t0() + Duration::days(days);

    let first = apply_time_decay(edge, &config, at(100)).edge;
    let again = apply_time_decay(first.clone(), &config, at(100));
    assert!(!again.decay_applied);
    assert_eq!(again.edge, first);

    let later = apply_time_decay(first.clone(), &config, at(200)).edge;
    assert!(later.components.coactivation_bonus <= first.components.coactivation_bonus);

    // stepping through time lands where one jump does
    let direct = bonus * 0.95f64.powi(5);
    assert!((later.components.coactivation_bonus - direct).abs() < 1e-12);
}

#[test]
fn engagement_after_decay_restarts_the_clock() {
    let config = TimeDecayConfig::default();
    let edge = engage(user_edge("a", "b", 0.6, t0()), 60.0, 0).edge;
    let decayed = apply_time_decay(edge, &config, t0() + Duration::days(100)).edge;
    assert!(decayed.edge.neural.decay_factor < 1.0);

    let refreshed = update_coactivation(
        decayed,
        60.0,
        &HebbianConfig::default(),
        &ProvisionalConfig::default(),
        t0() + Duration::days(100),
    )
    .edge;
    assert_eq!(refreshed.edge.neural.decay_factor, 1.0);
    assert!(!apply_time_decay(refreshed, &config, t0() + Duration::days(120)).decay_applied);
}

// === Scenario 5: death ===

#[test]
fn an_edge_on_the_floor_without_bonus_is_dead() {
    let mut edge = user_edge("a", "b", 0.5, t0());
    assert!(!is_edge_dead(&edge));

    edge.components.base_weight = 0.08;
    assert!(is_edge_dead(&edge));

    edge.components.coactivation_bonus = 0.01;
    assert!(!is_edge_dead(&edge), "a remaining bonus keeps it alive");
}
