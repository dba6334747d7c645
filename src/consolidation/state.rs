//! Compression state of an original node, and the node's compression phase

use super::config::CompressionConfig;
use super::eligibility::is_compression_candidate;
use super::summary::SummaryId;
use crate::clock::saturating_add;
use crate::graph::{Lifecycle, NodeSnapshot};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Attached to a node once it has been folded into a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeCompressionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_into: Option<SummaryId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compressed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restorable_until: Option<DateTime<Utc>>,
}

impl NodeCompressionState {
    pub fn is_compressed(&self) -> bool {
        self.compressed_into.is_some()
    }
}

pub fn create_compression_state(
    summary_id: SummaryId,
    restorable_days: i64,
    now: DateTime<Utc>,
) -> NodeCompressionState {
    NodeCompressionState {
        compressed_into: Some(summary_id),
        compressed_at: Some(now),
        restorable_until: Some(saturating_add(
            now,
            Duration::try_days(restorable_days).unwrap_or(Duration::MAX),
        )),
    }
}

pub fn is_restorable(state: &NodeCompressionState, now: DateTime<Utc>) -> bool {
    state.restorable_until.map(|until| now < until).unwrap_or(false)
}

/// Clear the compression state if the node can still be restored.
/// Returns `None` once the window has closed.
pub fn restore_compression_state(
    state: &NodeCompressionState,
    now: DateTime<Utc>,
) -> Option<NodeCompressionState> {
    if is_restorable(state, now) {
        Some(NodeCompressionState::default())
    } else {
        None
    }
}

/// Where a node sits in the compression lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionPhase {
    Active,
    Dormant,
    Candidate,
    Restorable,
    Superseded,
}

pub fn compression_phase(
    node: &NodeSnapshot,
    state: &NodeCompressionState,
    strong_active_edges: usize,
    config: &CompressionConfig,
    now: DateTime<Utc>,
) -> CompressionPhase {
    if state.is_compressed() {
        return if is_restorable(state, now) {
            CompressionPhase::Restorable
        } else {
            CompressionPhase::Superseded
        };
    }
    match node.lifecycle {
        Lifecycle::Dormant if is_compression_candidate(node, strong_active_edges, config, now) => {
            CompressionPhase::Candidate
        }
        Lifecycle::Dormant => CompressionPhase::Dormant,
        Lifecycle::Active => CompressionPhase::Active,
        // compressed with no restore window on record
        Lifecycle::Compressed => CompressionPhase::Superseded,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompressionSettings;
    use crate::consolidation::get_compression_config;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 9, 1, 0, 0, 0).unwrap()
    }

    fn summary_id() -> SummaryId {
        SummaryId::from_string("sum_abcdefghijkl")
    }

    #[test]
    fn restorable_immediately_after_compression() {
        let state = create_compression_state(summary_id(), 365, now());
        assert!(is_restorable(&state, now()));
        assert!(is_restorable(&state, now() + Duration::seconds(1)));
        assert_eq!(state.restorable_until, Some(now() + Duration::days(365)));
    }

    #[test]
    fn not_restorable_after_window() {
        let state = create_compression_state(summary_id(), 365, now());
        assert!(!is_restorable(&state, now() + Duration::days(365)));
        assert!(!is_restorable(&state, now() + Duration::days(400)));
        assert!(!is_restorable(&NodeCompressionState::default(), now()));
    }

    #[test]
    fn restore_clears_state_only_within_window() {
        let state = create_compression_state(summary_id(), 10, now());
        let restored = restore_compression_state(&state, now() + Duration::days(5)).unwrap();
        assert!(!restored.is_compressed());
        assert!(restore_compression_state(&state, now() + Duration::days(11)).is_none());
    }

    #[test]
    fn phases_follow_the_lifecycle() {
        let config = get_compression_config(100, &CompressionSettings::default());
        let fresh = NodeCompressionState::default();
        let old = now() - Duration::days(500);

        let active = NodeSnapshot::new("a", old);
        assert_eq!(compression_phase(&active, &fresh, 0, &config, now()), CompressionPhase::Active);

        let dormant = NodeSnapshot::new("b", old)
            .dormant_since(now() - Duration::days(10))
            .with_importance(0.1);
        assert_eq!(compression_phase(&dormant, &fresh, 0, &config, now()), CompressionPhase::Dormant);

        let candidate = NodeSnapshot::new("c", old)
            .dormant_since(now() - Duration::days(90))
            .with_importance(0.1);
        assert_eq!(compression_phase(&candidate, &fresh, 0, &config, now()), CompressionPhase::Candidate);

        let pinned = candidate.clone().pinned();
        assert_eq!(compression_phase(&pinned, &fresh, 0, &config, now()), CompressionPhase::Dormant);

        let compressed = create_compression_state(summary_id(), 365, now());
        assert_eq!(
            compression_phase(&candidate, &compressed, 0, &config, now()),
            CompressionPhase::Restorable
        );
        assert_eq!(
            compression_phase(&candidate, &compressed, 0, &config, now() + Duration::days(366)),
            CompressionPhase::Superseded
        );
    }
}
