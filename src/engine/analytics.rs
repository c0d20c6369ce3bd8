//! The analytics facade: keeps the snapshot fresh and runs the algorithms over it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::AnalyticsConfig;
use crate::graph::{trace_causal_chain, CausalLink, Snapshot, SnapshotCache, TraversalDirection};
use crate::store::GraphStore;
use crate::types::{AnalyticsError, AnalyticsResult, NodeId};

use super::activation::{spread_activation, ActivationParams, ActivationResult};
use super::contradiction::{
    semantic_candidates, structural_contradictions, ContradictionPair, SemanticCandidate,
    SemanticParams,
};
use super::importance::{compute_importance, ImportanceResult};
use super::walk::{stochastic_walk, WalkParams, WalkResult};

/// Entry point for callers. The only component that talks to the store.
pub struct AnalyticsEngine {
    store: Arc<dyn GraphStore>,
    cache: SnapshotCache,
    config: AnalyticsConfig,
    rng: Mutex<StdRng>,
}

impl AnalyticsEngine {
    /// Create an engine over `store`. The configuration is validated here.
    pub fn new(store: Arc<dyn GraphStore>, config: AnalyticsConfig) -> AnalyticsResult<Self> {
        config.validate()?;
        let rng = match config.walk.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            store,
            cache: SnapshotCache::new(config.cache.ttl()),
            config,
            rng: Mutex::new(rng),
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// The store collaborator, for callers persisting analysis output.
    pub fn store(&self) -> &Arc<dyn GraphStore> {
        &self.store
    }

    /// The snapshot cache.
    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// The current snapshot without any refresh, stale or not.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.cache.current()
    }

    /// Force an extraction regardless of staleness.
    pub async fn refresh(&self) -> AnalyticsResult<Arc<Snapshot>> {
        self.cache
            .extract_with_timeout(self.store.as_ref(), self.config.cache.fetch_timeout())
            .await
    }

    /// The current snapshot, re-extracted first if stale.
    pub async fn fresh_snapshot(&self) -> AnalyticsResult<Arc<Snapshot>> {
        if !self.cache.is_stale() {
            if let Some(snapshot) = self.cache.current() {
                return Ok(snapshot);
            }
        }
        log::debug!("Snapshot stale, refreshing");
        self.refresh().await
    }

    /// Importance of every node. Without explicit personalization, teleports
    /// uniformly, or by node weight when `importance.personalize_by_weight` is set.
    /// The iteration runs on a blocking worker.
    pub async fn compute_importance(
        &self,
        personalization: Option<HashMap<NodeId, f64>>,
    ) -> AnalyticsResult<ImportanceResult> {
        let snapshot = self.fresh_snapshot().await?;
        let params = self.config.importance.params();

        let personalization = match personalization {
            Some(p) => Some(p),
            None if self.config.importance.personalize_by_weight => {
                let weights = snapshot.node_weights().clone();
                let total: f64 = weights.values().sum();
                (total > 0.0).then_some(weights)
            }
            None => None,
        };

        tokio::task::spawn_blocking(move || {
            compute_importance(snapshot.adjacency(), personalization.as_ref(), &params)
        })
        .await
        .map_err(|e| AnalyticsError::Worker(e.to_string()))?
    }

    /// At most `limit` nodes by descending importance, ties by ascending id.
    pub async fn top_k_by_importance(&self, limit: usize) -> AnalyticsResult<Vec<(NodeId, f64)>> {
        Ok(self.compute_importance(None).await?.top_k(limit))
    }

    /// Spread activation from `seeds`, using configured defaults unless `params` is given.
    pub async fn spread_activation(
        &self,
        seeds: &[NodeId],
        params: Option<ActivationParams>,
    ) -> AnalyticsResult<ActivationResult> {
        let snapshot = self.fresh_snapshot().await?;
        let params = params.unwrap_or_else(|| self.config.activation.params());
        spread_activation(snapshot.adjacency(), seeds, &params)
    }

    /// Belief pairs connected in the graph, filtered by the configured
    /// relationship types (empty = any connection). Content and edges come
    /// from the same snapshot.
    pub async fn detect_structural_contradictions(&self) -> AnalyticsResult<Vec<ContradictionPair>> {
        let snapshot = self.fresh_snapshot().await?;
        let beliefs = snapshot.beliefs();
        let pairs = structural_contradictions(
            beliefs,
            snapshot.typed_adjacency(),
            &self.config.contradiction.relationship_filter,
        );
        log::info!(
            "Structural contradiction scan over {} beliefs: {} candidates",
            beliefs.len(),
            pairs.len()
        );
        Ok(pairs)
    }

    /// Lexically similar confident beliefs, for external confirmation.
    /// `threshold` overrides the configured similarity threshold.
    pub async fn semantic_contradiction_candidates(
        &self,
        threshold: Option<f64>,
    ) -> AnalyticsResult<Vec<SemanticCandidate>> {
        let mut params: SemanticParams = self.config.contradiction.semantic_params();
        if let Some(threshold) = threshold {
            params.similarity_threshold = threshold;
        }
        params.validate()?;
        let snapshot = self.fresh_snapshot().await?;
        semantic_candidates(snapshot.beliefs(), &params)
    }

    /// Weighted random walk from `start`.
    pub async fn walk(
        &self,
        start: &str,
        steps: Option<usize>,
        quantum_delta: Option<f64>,
    ) -> AnalyticsResult<WalkResult> {
        let snapshot = self.fresh_snapshot().await?;
        let params = WalkParams {
            steps: steps.unwrap_or(self.config.walk.steps),
            quantum_delta,
        };
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        stochastic_walk(
            snapshot.adjacency(),
            snapshot.node_weights(),
            snapshot.node_types(),
            start,
            &params,
            &mut *rng,
        )
    }

    /// Causal chain from `start` over the configured causal relationship types.
    pub async fn trace_causal_chain(
        &self,
        start: &str,
        direction: TraversalDirection,
    ) -> AnalyticsResult<Vec<CausalLink>> {
        self.trace_causal_chain_with_depth(start, direction, self.config.causal.max_depth)
            .await
    }

    /// [`trace_causal_chain`](Self::trace_causal_chain) with an explicit depth bound.
    pub async fn trace_causal_chain_with_depth(
        &self,
        start: &str,
        direction: TraversalDirection,
        max_depth: usize,
    ) -> AnalyticsResult<Vec<CausalLink>> {
        let snapshot = self.fresh_snapshot().await?;
        trace_causal_chain(
            snapshot.typed_adjacency(),
            start,
            direction,
            &self.config.causal.causal_types,
            max_depth,
        )
    }
}
