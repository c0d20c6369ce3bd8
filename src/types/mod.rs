//! All data types for the analytics engine.

pub mod edge;
pub mod error;
pub mod node;

pub use edge::{EdgeRecord, RelationshipType, CAUSAL_TYPES};
pub use error::{AnalyticsError, AnalyticsResult, StoreError, StoreResult};
pub use node::{BeliefRecord, NodeRecord, NodeType, DEFAULT_ATTRIBUTE};

/// Opaque node identifier, as assigned by the graph store.
pub type NodeId = String;

/// Weight assumed for a neighbor missing from the weight map.
pub const UNKNOWN_NODE_WEIGHT: f64 = 0.1;

/// Floor applied to perturbed walk weights before normalization.
pub const PERTURBED_WEIGHT_FLOOR: f64 = 0.01;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}
