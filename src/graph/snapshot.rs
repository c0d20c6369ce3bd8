//! Read-optimized, immutable view of the store's graph at one point in time.

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use crate::types::{BeliefRecord, NodeId, NodeType, RelationshipType};

/// Undirected view: every edge appears under both endpoints.
pub type Adjacency = BTreeMap<NodeId, Vec<NodeId>>;

/// Directed view: outgoing `(neighbor, relationship)` pairs per source node.
pub type TypedAdjacency = BTreeMap<NodeId, Vec<(NodeId, RelationshipType)>>;

/// An extracted graph snapshot. Built once by [`SnapshotBuilder`](super::SnapshotBuilder)
/// and never mutated afterwards; refresh replaces the whole value.
#[derive(Debug)]
pub struct Snapshot {
    pub(crate) adjacency: Adjacency,
    pub(crate) typed_adjacency: TypedAdjacency,
    pub(crate) node_weights: HashMap<NodeId, f64>,
    pub(crate) node_types: HashMap<NodeId, NodeType>,
    pub(crate) beliefs: Vec<BeliefRecord>,
    pub(crate) edge_count: usize,
    pub(crate) extracted_at: Instant,
    pub(crate) extracted_at_micros: u64,
}

impl Snapshot {
    /// Number of eligible nodes.
    pub fn node_count(&self) -> usize {
        self.node_types.len()
    }

    /// Number of directed edges kept from the store.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.node_types.is_empty()
    }

    /// Whether a node is part of this snapshot.
    pub fn contains(&self, id: &str) -> bool {
        self.node_types.contains_key(id)
    }

    /// Symmetric adjacency used by ranking, activation and walks.
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Directed, typed adjacency used by causal tracing and contradiction detection.
    pub fn typed_adjacency(&self) -> &TypedAdjacency {
        &self.typed_adjacency
    }

    /// Per-node derived weights.
    pub fn node_weights(&self) -> &HashMap<NodeId, f64> {
        &self.node_weights
    }

    /// Per-node type labels.
    pub fn node_types(&self) -> &HashMap<NodeId, NodeType> {
        &self.node_types
    }

    /// Weight of a single node.
    pub fn weight(&self, id: &str) -> Option<f64> {
        self.node_weights.get(id).copied()
    }

    /// Type of a single node.
    pub fn node_type(&self, id: &str) -> Option<NodeType> {
        self.node_types.get(id).copied()
    }

    /// Undirected neighbors of a node.
    pub fn neighbors(&self, id: &str) -> &[NodeId] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Belief content captured at extraction, ordered by id.
    pub fn beliefs(&self) -> &[BeliefRecord] {
        &self.beliefs
    }

    /// IDs of all nodes of the given type, sorted.
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .node_types
            .iter()
            .filter(|(_, t)| **t == node_type)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Monotonic instant of the extraction that produced this snapshot.
    pub fn extracted_at(&self) -> Instant {
        self.extracted_at
    }

    /// Wall-clock time of the extraction (Unix epoch microseconds).
    pub fn extracted_at_micros(&self) -> u64 {
        self.extracted_at_micros
    }
}
