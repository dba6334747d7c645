//! Nous weights: edge weight determination and consolidation
//!
//! The engine behind a personal knowledge graph's typed, weighted edges.
//! It scores new edges from five creation sources, reinforces and decays
//! them as the graph is used, infers temporal edges from session logs, and
//! decides when dormant regions are compressed into summary nodes.
//!
//! # Core Concepts
//!
//! - **Weight components**: `base * (1 + learned) + bonus`, clamped to [0.1, 1.0]
//! - **Policies**: extraction, similarity, user, temporal and co-activation
//! - **Hebbian learning**: engagement grows the co-activation bonus, disuse decays it
//! - **Consolidation**: dormant clusters fold into restorable summaries
//!
//! Every rule is a pure function of its inputs and an explicit `now`.
//! [`WeightEngine`] wraps them around an in-memory edge table.
//!
//! # Example
//!
//! ```
//! use nous_weights::{EdgeType, EngineConfig, WeightEngine};
//!
//! let engine = WeightEngine::new(EngineConfig::default()).unwrap();
//! let edge = engine
//!     .create_user_edge("a".into(), "b".into(), EdgeType::UserLinked, None)
//!     .unwrap();
//! assert_eq!(edge.effective_weight(), 0.9);
//! ```

pub mod clock;
pub mod config;
pub mod consolidation;
mod graph;
pub mod hebbian;
pub mod policy;
pub mod session;
pub mod validation;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, EngineConfig};
pub use graph::{
    apply_coactivation_bonus, apply_learning_adjustment, calculate_effective_weight, create_weight_components,
    decay_coactivation_bonus, CreationSource, EdgeId, EdgeProvenance, EdgeStatus, EdgeType, EffectiveWeightResult,
    EmbeddingFreshnessState, Lifecycle, NeuralState, NodeId, NodeSnapshot, NousEdge, NousError, NousResult,
    ProvisionalEdgeState, WeightComponents, WeightEngine, WeightedEdge, COACTIVATION_BONUS_MAX, EDGE_ID_PREFIX,
    EFFECTIVE_WEIGHT_MAX, EFFECTIVE_WEIGHT_MIN, ID_SUFFIX_LEN, LEARNED_ADJUSTMENT_LIMIT,
};
pub use validation::SchemaError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
