//! Engine configuration
//!
//! Every threshold and constant table the engine uses lives here and is
//! passed into the entry points by reference. Defaults are the production
//! values; a YAML file can override any subset of them.

use crate::graph::{EdgeType, EFFECTIVE_WEIGHT_MIN};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config value {field} = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Longest retention, expiry or gap window a config may describe
pub const MAX_WINDOW_DAYS: i64 = 36_500;

/// Highest base weight a type table entry may carry
pub const MAX_TYPE_WEIGHT: f64 = 0.95;

/// Default base weight per edge type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeTypeWeights(BTreeMap<EdgeType, f64>);

impl EdgeTypeWeights {
    pub fn new(weights: BTreeMap<EdgeType, f64>) -> Self {
        Self(weights)
    }

    /// The table's weight for a type, if it has one.
    pub fn get(&self, edge_type: EdgeType) -> Option<f64> {
        self.0.get(&edge_type).copied()
    }

    pub fn with_weight(mut self, edge_type: EdgeType, weight: f64) -> Self {
        self.0.insert(edge_type, weight);
        self
    }

    pub fn without(mut self, edge_type: EdgeType) -> Self {
        self.0.remove(&edge_type);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (EdgeType, f64)> + '_ {
        self.0.iter().map(|(t, w)| (*t, *w))
    }
}

impl Default for EdgeTypeWeights {
    fn default() -> Self {
        use EdgeType::*;
        Self(BTreeMap::from([
            (RelatesTo, 0.60),
            (PartOf, 0.85),
            (MentionedIn, 0.70),
            (Causes, 0.80),
            (Precedes, 0.65),
            (Contradicts, 0.75),
            (Supersedes, 0.90),
            (DerivedFrom, 0.85),
            (SimilarTo, 0.70),
            (CausedBy, 0.80),
            (UserLinked, 0.95),
            (TemporalAdjacent, 0.50),
            (TemporalContinuation, 0.40),
            (CoActivated, 0.50),
            (Summarizes, 0.90),
            (ExampleOf, 0.75),
        ]))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// At or above: confirmed edge
    pub confirmed_threshold: f64,
    /// At or above (and below confirmed): provisional edge
    pub provisional_threshold: f64,
    /// Extra scaling applied to provisional weights
    pub provisional_factor: f64,
    /// Base weight for types missing from the table
    pub unknown_type_weight: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            confirmed_threshold: 0.70,
            provisional_threshold: 0.50,
            provisional_factor: 0.5,
            unknown_type_weight: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    pub threshold: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { threshold: 0.85 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub default_strength: f64,
    pub min_strength: f64,
    pub max_strength: f64,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            default_strength: 0.90,
            min_strength: 0.50,
            max_strength: 1.00,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemporalConfig {
    /// Time constant of `e^(-gap / decay_minutes)`
    pub decay_minutes: f64,
    pub weight_floor: f64,
    /// Adjacent accesses further apart are not linked
    pub max_gap_minutes: f64,
    /// Fixed weight of cross-session continuation edges
    pub continuation_weight: f64,
    pub continuation_max_gap_hours: i64,
}

impl Default for TemporalConfig {
    fn default() -> Self {
        Self {
            decay_minutes: 30.0,
            weight_floor: 0.20,
            max_gap_minutes: 120.0,
            continuation_weight: 0.30,
            continuation_max_gap_hours: 24,
        }
    }
}

impl TemporalConfig {
    pub fn continuation_max_gap(&self) -> Duration {
        Duration::try_hours(self.continuation_max_gap_hours).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoactivationConfig {
    /// Similarity must exceed this for a new co-activation edge to be considered
    pub consider_threshold: f64,
    pub initial_weight: f64,
}

impl Default for CoactivationConfig {
    fn default() -> Self {
        Self {
            consider_threshold: 0.50,
            initial_weight: 0.30,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HebbianConfig {
    /// Viewing at least this long counts as engagement
    pub engagement_seconds: f64,
    pub strengthen_delta: f64,
    pub ignore_decay_delta: f64,
    pub consecutive_ignores_before_decay: u32,
}

impl Default for HebbianConfig {
    fn default() -> Self {
        Self {
            engagement_seconds: 5.0,
            strengthen_delta: 0.10,
            ignore_decay_delta: 0.02,
            consecutive_ignores_before_decay: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeDecayConfig {
    /// No decay before this many idle days
    pub grace_days: f64,
    pub period_days: f64,
    pub factor_per_period: f64,
}

impl Default for TimeDecayConfig {
    fn default() -> Self {
        Self {
            grace_days: 30.0,
            period_days: 30.0,
            factor_per_period: 0.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionalConfig {
    pub ttl_days: i64,
    pub promotion_activations: u32,
}

impl Default for ProvisionalConfig {
    fn default() -> Self {
        Self {
            ttl_days: 30,
            promotion_activations: 3,
        }
    }
}

impl ProvisionalConfig {
    pub fn ttl(&self) -> Duration {
        Duration::try_days(self.ttl_days).unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub timeout_minutes: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { timeout_minutes: 30 }
    }
}

impl SessionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::try_minutes(self.timeout_minutes).unwrap_or(Duration::MAX)
    }
}

/// Graph-size tier boundaries and per-tier minimum batch sizes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionTiers {
    /// Graphs with fewer nodes are small
    pub small_below: usize,
    /// Graphs with fewer nodes (and not small) are medium
    pub medium_below: usize,
    pub small_min_nodes: usize,
    pub medium_min_nodes: usize,
    pub large_min_nodes: usize,
}

impl Default for CompressionTiers {
    fn default() -> Self {
        Self {
            small_below: 500,
            medium_below: 5000,
            small_min_nodes: 3,
            medium_min_nodes: 5,
            large_min_nodes: 10,
        }
    }
}

/// Compression settings; resolved per graph size into a `CompressionConfig`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressionSettings {
    pub tiers: CompressionTiers,
    pub similarity_threshold: f64,
    pub max_nodes_per_summary: usize,
    pub restorable_days: i64,
    pub dormant_days_minimum: f64,
    pub importance_max: f64,
    pub strong_active_edges_max: usize,
    pub never_compress_age_days: f64,
    /// Effective weight at which an edge counts as strong
    pub strong_edge_min_weight: f64,
    /// An edge counts as active if co-activated within this many days
    pub active_window_days: f64,
}

impl Default for CompressionSettings {
    fn default() -> Self {
        Self {
            tiers: CompressionTiers::default(),
            similarity_threshold: 0.75,
            max_nodes_per_summary: 20,
            restorable_days: 365,
            dormant_days_minimum: 60.0,
            importance_max: 0.3,
            strong_active_edges_max: 2,
            never_compress_age_days: 30.0,
            strong_edge_min_weight: 0.5,
            active_window_days: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Aggregated summary edges weaker than this are discarded.
    /// Conventional value; tune freely.
    pub min_aggregated_weight: f64,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            min_aggregated_weight: 0.5,
        }
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub edge_type_weights: EdgeTypeWeights,
    pub extraction: ExtractionConfig,
    pub similarity: SimilarityConfig,
    pub user: UserConfig,
    pub temporal: TemporalConfig,
    pub coactivation: CoactivationConfig,
    pub hebbian: HebbianConfig,
    pub time_decay: TimeDecayConfig,
    pub provisional: ProvisionalConfig,
    pub session: SessionConfig,
    pub compression: CompressionSettings,
    pub aggregation: AggregationConfig,
}

fn unit_interval(field: &'static str, value: f64) -> ConfigResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be within [0, 1]",
        })
    }
}

/// Weights a fresh edge is created at must not sit below the effective
/// floor, or the stored base weight and the effective weight disagree.
fn at_least_floor(field: &'static str, value: f64) -> ConfigResult<()> {
    if value >= EFFECTIVE_WEIGHT_MIN {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must not be below the effective weight floor of 0.10",
        })
    }
}

fn window(field: &'static str, value: i64, max: i64) -> ConfigResult<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value: value as f64,
            reason: "must be positive and span at most 36500 days",
        })
    }
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            value,
            reason: "must be positive",
        })
    }
}

impl EngineConfig {
    /// Parse and validate a YAML document. Missing sections keep defaults.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a YAML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Check value ranges and orderings.
    pub fn validate(&self) -> ConfigResult<()> {
        for (_, weight) in self.edge_type_weights.iter() {
            if !(weight > 0.0 && weight <= MAX_TYPE_WEIGHT) {
                return Err(ConfigError::Invalid {
                    field: "edge_type_weights",
                    value: weight,
                    reason: "base weights must be within (0, 0.95]",
                });
            }
        }

        let ex = &self.extraction;
        unit_interval("extraction.confirmed_threshold", ex.confirmed_threshold)?;
        unit_interval("extraction.provisional_threshold", ex.provisional_threshold)?;
        unit_interval("extraction.provisional_factor", ex.provisional_factor)?;
        if !(ex.unknown_type_weight > 0.0 && ex.unknown_type_weight <= MAX_TYPE_WEIGHT) {
            return Err(ConfigError::Invalid {
                field: "extraction.unknown_type_weight",
                value: ex.unknown_type_weight,
                reason: "base weights must be within (0, 0.95]",
            });
        }
        if ex.provisional_threshold > ex.confirmed_threshold {
            return Err(ConfigError::Invalid {
                field: "extraction.provisional_threshold",
                value: ex.provisional_threshold,
                reason: "must not exceed confirmed_threshold",
            });
        }
        // the weakest extraction edge is a provisional one at the lowest
        // accepted confidence
        let weakest_factor = ex.provisional_threshold * ex.provisional_factor;
        let table = self.edge_type_weights.iter().map(|(_, w)| ("edge_type_weights", w));
        for (field, weight) in table.chain([("extraction.unknown_type_weight", ex.unknown_type_weight)]) {
            if weight * weakest_factor + 1e-9 < EFFECTIVE_WEIGHT_MIN {
                return Err(ConfigError::Invalid {
                    field,
                    value: weight,
                    reason: "weakest provisional extraction weight falls below the 0.10 floor",
                });
            }
        }

        unit_interval("similarity.threshold", self.similarity.threshold)?;
        at_least_floor("similarity.threshold", self.similarity.threshold)?;

        let user = &self.user;
        unit_interval("user.min_strength", user.min_strength)?;
        at_least_floor("user.min_strength", user.min_strength)?;
        unit_interval("user.max_strength", user.max_strength)?;
        if user.min_strength > user.max_strength {
            return Err(ConfigError::Invalid {
                field: "user.min_strength",
                value: user.min_strength,
                reason: "must not exceed max_strength",
            });
        }

        let temporal = &self.temporal;
        positive("temporal.decay_minutes", temporal.decay_minutes)?;
        positive("temporal.max_gap_minutes", temporal.max_gap_minutes)?;
        unit_interval("temporal.weight_floor", temporal.weight_floor)?;
        at_least_floor("temporal.weight_floor", temporal.weight_floor)?;
        unit_interval("temporal.continuation_weight", temporal.continuation_weight)?;
        at_least_floor("temporal.continuation_weight", temporal.continuation_weight)?;
        window(
            "temporal.continuation_max_gap_hours",
            temporal.continuation_max_gap_hours,
            MAX_WINDOW_DAYS * 24,
        )?;

        unit_interval("coactivation.consider_threshold", self.coactivation.consider_threshold)?;
        unit_interval("coactivation.initial_weight", self.coactivation.initial_weight)?;
        at_least_floor("coactivation.initial_weight", self.coactivation.initial_weight)?;

        positive("hebbian.engagement_seconds", self.hebbian.engagement_seconds)?;
        unit_interval("hebbian.strengthen_delta", self.hebbian.strengthen_delta)?;
        unit_interval("hebbian.ignore_decay_delta", self.hebbian.ignore_decay_delta)?;
        positive(
            "hebbian.consecutive_ignores_before_decay",
            f64::from(self.hebbian.consecutive_ignores_before_decay),
        )?;

        positive("time_decay.period_days", self.time_decay.period_days)?;
        unit_interval("time_decay.factor_per_period", self.time_decay.factor_per_period)?;
        if self.time_decay.grace_days < 0.0 {
            return Err(ConfigError::Invalid {
                field: "time_decay.grace_days",
                value: self.time_decay.grace_days,
                reason: "must not be negative",
            });
        }

        window("provisional.ttl_days", self.provisional.ttl_days, MAX_WINDOW_DAYS)?;
        window(
            "session.timeout_minutes",
            self.session.timeout_minutes,
            MAX_WINDOW_DAYS * 24 * 60,
        )?;

        let comp = &self.compression;
        if comp.tiers.small_below >= comp.tiers.medium_below {
            return Err(ConfigError::Invalid {
                field: "compression.tiers.small_below",
                value: comp.tiers.small_below as f64,
                reason: "must be below medium_below",
            });
        }
        positive("compression.tiers.small_min_nodes", comp.tiers.small_min_nodes as f64)?;
        unit_interval("compression.similarity_threshold", comp.similarity_threshold)?;
        unit_interval("compression.importance_max", comp.importance_max)?;
        unit_interval("compression.strong_edge_min_weight", comp.strong_edge_min_weight)?;
        window("compression.restorable_days", comp.restorable_days, MAX_WINDOW_DAYS)?;
        let largest_min = comp
            .tiers
            .small_min_nodes
            .max(comp.tiers.medium_min_nodes)
            .max(comp.tiers.large_min_nodes);
        if comp.max_nodes_per_summary < largest_min {
            return Err(ConfigError::Invalid {
                field: "compression.max_nodes_per_summary",
                value: comp.max_nodes_per_summary as f64,
                reason: "must be at least every tier's minimum batch size",
            });
        }

        unit_interval("aggregation.min_aggregated_weight", self.aggregation.min_aggregated_weight)?;
        Ok(())
    }
}
