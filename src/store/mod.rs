//! The graph-store collaborator: a narrow async fetch/mutate interface plus
//! in-memory and JSON-file implementations.

pub mod document;
pub mod json;
pub mod memory;

use async_trait::async_trait;

use crate::types::{BeliefRecord, EdgeRecord, NodeRecord, RelationshipType, StoreResult};

pub use document::{GraphDocument, StoredEdge, StoredNode};
pub use json::JsonFileStore;
pub use memory::InMemoryStore;

/// Properties attached to an edge created through [`GraphStore::create_edge`].
pub type EdgeProperties = serde_json::Map<String, serde_json::Value>;

/// Access to the authoritative graph. The analytics engine only reads through
/// this trait; `create_edge` is for downstream callers persisting results.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Fetch every node.
    async fn fetch_nodes(&self) -> StoreResult<Vec<NodeRecord>>;

    /// Fetch every directed edge.
    async fn fetch_edges(&self) -> StoreResult<Vec<EdgeRecord>>;

    /// Fetch belief nodes with their content, optionally filtered by confidence.
    async fn fetch_beliefs(&self, min_confidence: Option<f64>) -> StoreResult<Vec<BeliefRecord>>;

    /// Persist a new directed edge.
    async fn create_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: RelationshipType,
        properties: EdgeProperties,
    ) -> StoreResult<()>;
}
