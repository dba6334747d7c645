//! Core edge and node data structures

mod edge;
mod engine;
mod node;
mod provisional;
mod weight;

pub use edge::{
    CreationSource, EdgeId, EdgeProvenance, EdgeStatus, EdgeType, NeuralState, NousEdge, WeightedEdge,
    EDGE_ID_PREFIX, ID_SUFFIX_LEN,
};
pub(crate) use edge::{has_id_shape, random_id_suffix};
pub use engine::{NousError, NousResult, WeightEngine};
pub use node::{EmbeddingFreshnessState, Lifecycle, NodeId, NodeSnapshot};
pub use provisional::ProvisionalEdgeState;
pub use weight::{
    apply_coactivation_bonus, apply_learning_adjustment, calculate_effective_weight, create_weight_components,
    decay_coactivation_bonus, EffectiveWeightResult, WeightComponents, COACTIVATION_BONUS_MAX,
    EFFECTIVE_WEIGHT_MAX, EFFECTIVE_WEIGHT_MIN, LEARNED_ADJUSTMENT_LIMIT,
};
