//! Analytics algorithms over a snapshot, and the facade that runs them.

pub mod activation;
pub mod analytics;
pub mod contradiction;
pub mod importance;
pub mod walk;

pub use activation::{spread_activation, ActivatedNode, ActivationParams, ActivationResult};
pub use analytics::AnalyticsEngine;
pub use contradiction::{
    jaccard_similarity, semantic_candidates, semantic_pairs, structural_contradictions,
    ContradictionPair, DetectionMethod, SemanticCandidate, SemanticParams,
};
pub use importance::{compute_importance, ImportanceParams, ImportanceResult};
pub use walk::{stochastic_walk, WalkParams, WalkResult};
