//! AgenticGraph: snapshot-cached analytics over an agent's knowledge graph.
//!
//! Extracts a read-optimized snapshot from an external graph store and runs
//! importance ranking, spreading activation, contradiction detection, stochastic
//! walks and causal tracing over it.

pub mod cli;
pub mod config;
pub mod engine;
pub mod graph;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::{load_config, parse_config, AnalyticsConfig};
pub use engine::{
    ActivatedNode, ActivationParams, ActivationResult, AnalyticsEngine, ContradictionPair,
    DetectionMethod, ImportanceParams, ImportanceResult, SemanticCandidate, SemanticParams,
    WalkParams, WalkResult,
};
pub use graph::{
    Adjacency, CausalLink, Snapshot, SnapshotBuilder, SnapshotCache, TraversalDirection,
    TypedAdjacency,
};
pub use store::{GraphDocument, GraphStore, InMemoryStore, JsonFileStore};
pub use types::{
    AnalyticsError, AnalyticsResult, BeliefRecord, EdgeRecord, NodeId, NodeRecord, NodeType,
    RelationshipType, StoreError, CAUSAL_TYPES,
};
