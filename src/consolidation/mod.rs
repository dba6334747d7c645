//! Consolidation: compressing dormant graph regions into summary nodes
//!
//! A node moves `active → dormant → candidate → compressed`, then either
//! back to active by restoration or to permanently superseded once its
//! restorable window closes. There is no shortcut from active to compressed.

mod compress;
mod config;
mod eligibility;
mod planning;
mod state;
mod summary;

pub use compress::{check_compression_batch, compress_batch, CompressionOutcome};
pub use config::{
    get_compression_config, graph_size_tier, CandidateRequirements, ClusteringRules, CompressionConfig,
    GraphSizeTier, NeverCompressRules, RetentionRules,
};
pub use eligibility::{
    count_strong_active_edges, is_compression_candidate, is_never_compress, is_strong_active_edge,
    meets_compression_requirements,
};
pub use planning::{plan_compression_batches, CompressionBatch, CompressionCandidate};
pub use state::{
    compression_phase, create_compression_state, is_restorable, restore_compression_state, CompressionPhase,
    NodeCompressionState,
};
pub use summary::{
    calculate_aggregated_weight, create_edge_record, create_summary_node, truncate_title, CompressedEdgeRecord,
    SummaryContent, SummaryId, SummaryKind, SummaryNode, TemporalSpan, SUMMARY_ID_PREFIX, SUMMARY_TITLE_MAX_CHARS,
};
