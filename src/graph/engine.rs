//! WeightEngine: in-memory edge table with per-edge serialized updates

use super::edge::{EdgeId, EdgeType, WeightedEdge};
use super::node::{EmbeddingFreshnessState, NodeId};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, EngineConfig};
use crate::consolidation::{
    check_compression_batch, compress_batch, count_strong_active_edges, get_compression_config, CompressionBatch,
    CompressionConfig, CompressionOutcome, SummaryContent,
};
use crate::hebbian::{apply_time_decay, prune_candidates, update_coactivation, CoactivationUpdateResult, EdgeDisposition};
use crate::policy::{
    build_edge, calculate_coactivation_edge, calculate_extraction_edge, calculate_user_edge,
    similarity_edge_if_fresh, PolicyOutcome,
};
use crate::session::{create_session_temporal_edges, detect_continuation_edges, Session};
use crate::validation::{validate_weighted_edge, SchemaError};
use dashmap::DashMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the engine facade
#[derive(Debug, Error)]
pub enum NousError {
    #[error("Edge not found: {0}")]
    EdgeNotFound(EdgeId),

    #[error("Edge type {0} cannot be created by a user")]
    TypeNotUserCreatable(EdgeType),

    #[error("Compression batch is empty")]
    EmptyBatch,

    #[error("Compression batch of {size} is below the tier minimum of {min}")]
    BatchTooSmall { size: usize, min: usize },

    #[error("Node {0} is not a compression candidate")]
    IneligibleNode(NodeId),

    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for engine operations
pub type NousResult<T> = Result<T, NousError>;

/// Edge table plus the configuration and clock every operation reads.
///
/// Each mutation holds the edge's shard lock while it reads the current
/// state and writes the next one, so concurrent updates to one edge are
/// serialized and none is lost. Updates to different edges proceed in
/// parallel.
pub struct WeightEngine {
    edges: DashMap<EdgeId, WeightedEdge>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for WeightEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightEngine")
            .field("edges", &self.edges.len())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for WeightEngine {
    fn default() -> Self {
        Self {
            edges: DashMap::new(),
            config: EngineConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

impl WeightEngine {
    /// Create an engine on the wall clock. The config is validated first.
    pub fn new(config: EngineConfig) -> NousResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> NousResult<Self> {
        config.validate()?;
        Ok(Self {
            edges: DashMap::new(),
            config,
            clock,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Edge table ---

    /// Insert or replace an edge after validating it.
    pub fn insert(&self, edge: WeightedEdge) -> NousResult<EdgeId> {
        validate_weighted_edge(&edge)?;
        let id = edge.id().clone();
        self.edges.insert(id.clone(), edge);
        Ok(id)
    }

    pub fn get(&self, id: &EdgeId) -> Option<WeightedEdge> {
        self.edges.get(id).map(|r| r.clone())
    }

    pub fn remove(&self, id: &EdgeId) -> Option<WeightedEdge> {
        self.edges.remove(id).map(|(_, edge)| edge)
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Snapshot of every edge touching `node`.
    pub fn edges_touching(&self, node: &NodeId) -> Vec<WeightedEdge> {
        self.edges
            .iter()
            .filter(|r| r.value().touches(node))
            .map(|r| r.value().clone())
            .collect()
    }

    fn store(&self, source: NodeId, target: NodeId, edge_type: EdgeType, outcome: &PolicyOutcome) -> WeightedEdge {
        let edge = build_edge(source, target, edge_type, outcome, &self.config.provisional, self.clock.now());
        tracing::debug!(edge = %edge.id(), edge_type = %edge_type, weight = outcome.weight, status = ?outcome.status, "edge created");
        self.edges.insert(edge.id().clone(), edge.clone());
        edge
    }

    // --- Creation ---

    /// `None` when the extraction confidence is below the provisional threshold.
    pub fn create_extraction_edge(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: EdgeType,
        llm_confidence: f64,
    ) -> Option<WeightedEdge> {
        let outcome = calculate_extraction_edge(
            edge_type,
            llm_confidence,
            &self.config.edge_type_weights,
            &self.config.extraction,
        )?;
        Some(self.store(source, target, edge_type, &outcome))
    }

    /// `None` when similarity is below threshold or either embedding is stale.
    pub fn create_similarity_edge(
        &self,
        source: NodeId,
        target: NodeId,
        cosine_similarity: f64,
        source_embedding: &EmbeddingFreshnessState,
        target_embedding: &EmbeddingFreshnessState,
    ) -> Option<WeightedEdge> {
        let outcome = similarity_edge_if_fresh(
            cosine_similarity,
            source_embedding,
            target_embedding,
            &self.config.similarity,
        )?;
        Some(self.store(source, target, EdgeType::SimilarTo, &outcome))
    }

    pub fn create_user_edge(
        &self,
        source: NodeId,
        target: NodeId,
        edge_type: EdgeType,
        strength: Option<f64>,
    ) -> NousResult<WeightedEdge> {
        if !edge_type.is_user_creatable() {
            return Err(NousError::TypeNotUserCreatable(edge_type));
        }
        let outcome = calculate_user_edge(strength, &self.config.user);
        Ok(self.store(source, target, edge_type, &outcome))
    }

    /// Provisional `co_activated` edge, or `None` when the pair is not similar enough.
    pub fn create_coactivation_edge(&self, source: NodeId, target: NodeId, similarity: f64) -> Option<WeightedEdge> {
        let outcome = calculate_coactivation_edge(similarity, &self.config.coactivation)?;
        Some(self.store(source, target, EdgeType::CoActivated, &outcome))
    }

    /// Infer and store temporal edges for a sealed session, and continuation
    /// edges from `previous` when given.
    pub fn ingest_session(&self, session: &Session, previous: Option<&Session>) -> Vec<WeightedEdge> {
        let now = self.clock.now();
        let mut edges = create_session_temporal_edges(session, &self.config.temporal, &self.config.provisional, now);
        if let Some(previous) = previous {
            edges.extend(detect_continuation_edges(
                session,
                previous,
                &self.config.temporal,
                &self.config.provisional,
                now,
            ));
        }
        for edge in &edges {
            self.edges.insert(edge.id().clone(), edge.clone());
        }
        tracing::info!(session = %session.id, edges = edges.len(), "session ingested");
        edges
    }

    // --- Learning ---

    /// Record one traversal of an edge and whether the user engaged.
    pub fn record_engagement(&self, id: &EdgeId, view_duration_seconds: f64) -> NousResult<CoactivationUpdateResult> {
        let mut entry = self
            .edges
            .get_mut(id)
            .ok_or_else(|| NousError::EdgeNotFound(id.clone()))?;
        let result = update_coactivation(
            entry.value().clone(),
            view_duration_seconds,
            &self.config.hebbian,
            &self.config.provisional,
            self.clock.now(),
        );
        *entry.value_mut() = result.edge.clone();
        Ok(result)
    }

    /// Run time decay over every edge. Returns how many edges changed.
    pub fn decay_all(&self) -> usize {
        let now = self.clock.now();
        let mut decayed = 0;
        for mut entry in self.edges.iter_mut() {
            let result = apply_time_decay(entry.value().clone(), &self.config.time_decay, now);
            if result.decay_applied {
                decayed += 1;
                *entry.value_mut() = result.edge;
            }
        }
        tracing::info!(decayed, total = self.edges.len(), "time decay sweep");
        decayed
    }

    /// Dead and expired-provisional edges. Classification only; nothing is removed.
    pub fn prune_candidates(&self) -> Vec<(EdgeId, EdgeDisposition)> {
        let now = self.clock.now();
        let snapshot: Vec<WeightedEdge> = self.edges.iter().map(|r| r.value().clone()).collect();
        let candidates = prune_candidates(&snapshot, &self.config.provisional, now);
        tracing::info!(candidates = candidates.len(), "prune classification");
        candidates
    }

    // --- Consolidation ---

    pub fn compression_config(&self, graph_size: usize) -> CompressionConfig {
        get_compression_config(graph_size, &self.config.compression)
    }

    pub fn strong_active_edge_count(&self, node: &NodeId, graph_size: usize) -> usize {
        let config = self.compression_config(graph_size);
        let now = self.clock.now();
        let snapshot = self.edges_touching(node);
        count_strong_active_edges(node, &snapshot, &config, now)
    }

    /// Compress a planned batch.
    ///
    /// The batch is checked again against the current edges: a member that
    /// gained strong active edges since planning, or a batch below the
    /// current tier's minimum, is rejected and the table is left untouched.
    /// Otherwise the edges touching the batch are taken out of the table and
    /// replaced by the surviving summary edges. An engagement recorded on one
    /// of them either lands before it is taken, and is carried into the
    /// summary's records, or finds the edge gone. The caller persists the
    /// returned summary and compression states.
    pub fn compress(
        &self,
        batch: &CompressionBatch,
        content: SummaryContent,
        graph_size: usize,
    ) -> NousResult<CompressionOutcome> {
        let config = self.compression_config(graph_size);
        let now = self.clock.now();
        check_compression_batch(batch, &config, now, |id| {
            count_strong_active_edges(id, &self.edges_touching(id), &config, now)
        })?;

        let ids: Vec<EdgeId> = self
            .edges
            .iter()
            .filter(|r| batch.node_ids().any(|n| r.value().touches(n)))
            .map(|r| r.key().clone())
            .collect();
        let taken: Vec<WeightedEdge> = ids
            .iter()
            .filter_map(|id| self.edges.remove(id))
            .map(|(_, edge)| edge)
            .collect();

        match compress_batch(
            batch,
            content,
            &taken,
            &config,
            &self.config.aggregation,
            &self.config.provisional,
            now,
        ) {
            Ok(outcome) => {
                for edge in &outcome.summary_edges {
                    self.edges.insert(edge.id().clone(), edge.clone());
                }
                Ok(outcome)
            }
            Err(err) => {
                for edge in taken {
                    self.edges.insert(edge.id().clone(), edge);
                }
                Err(err)
            }
        }
    }
}
