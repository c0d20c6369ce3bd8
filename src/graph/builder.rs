//! Assembles a complete [`Snapshot`] from store records before it becomes visible.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

use crate::types::{
    now_micros, BeliefRecord, EdgeRecord, NodeId, NodeRecord, NodeType, RelationshipType,
};

use super::snapshot::{Adjacency, Snapshot, TypedAdjacency};

/// Builder for a snapshot. Nothing built here is observable until
/// [`build`](Self::build) hands back the finished value.
pub struct SnapshotBuilder {
    neighbors: BTreeMap<NodeId, BTreeSet<NodeId>>,
    typed: TypedAdjacency,
    node_weights: HashMap<NodeId, f64>,
    node_types: HashMap<NodeId, NodeType>,
    beliefs: BTreeMap<NodeId, BeliefRecord>,
    edge_count: usize,
    skipped_nodes: usize,
    skipped_edges: usize,
    clamped_nodes: usize,
}

impl SnapshotBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self {
            neighbors: BTreeMap::new(),
            typed: BTreeMap::new(),
            node_weights: HashMap::new(),
            node_types: HashMap::new(),
            beliefs: BTreeMap::new(),
            edge_count: 0,
            skipped_nodes: 0,
            skipped_edges: 0,
            clamped_nodes: 0,
        }
    }

    /// Build from a full fetch of nodes and edges.
    pub fn from_records(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Self {
        let mut builder = Self::new();
        for node in nodes {
            builder.add_node(node);
        }
        for edge in edges {
            builder.add_edge(edge);
        }
        builder
    }

    /// Attach belief content to the belief nodes already added.
    pub fn with_beliefs(mut self, beliefs: &[BeliefRecord]) -> Self {
        for belief in beliefs {
            self.add_belief(belief);
        }
        self
    }

    /// Add a node. Returns false when the node is skipped (unknown label or
    /// duplicate id).
    pub fn add_node(&mut self, record: &NodeRecord) -> bool {
        let Some(node_type) = NodeType::from_name(&record.node_type) else {
            log::warn!(
                "Skipping node {} with unknown type {:?}",
                record.id,
                record.node_type
            );
            self.skipped_nodes += 1;
            return false;
        };
        if self.node_types.contains_key(&record.id) {
            log::warn!("Skipping duplicate node {}", record.id);
            self.skipped_nodes += 1;
            return false;
        }

        let out_of_range = |v: Option<f64>| v.is_some_and(|v| !(0.0..=1.0).contains(&v));
        if out_of_range(record.confidence) || out_of_range(record.intensity) {
            log::warn!(
                "Node {} has confidence {:?} / intensity {:?} outside [0, 1]; clamping",
                record.id,
                record.confidence,
                record.intensity
            );
            self.clamped_nodes += 1;
        }

        self.node_types.insert(record.id.clone(), node_type);
        self.node_weights.insert(record.id.clone(), record.weight());
        self.neighbors.entry(record.id.clone()).or_default();
        self.typed.entry(record.id.clone()).or_default();
        true
    }

    /// Add a directed edge between two already-added nodes. Returns false when
    /// the edge is skipped (unknown label or an endpoint outside the node set).
    pub fn add_edge(&mut self, record: &EdgeRecord) -> bool {
        let Some(relationship) = RelationshipType::from_name(&record.relationship_type) else {
            log::warn!(
                "Skipping edge {} -> {} with unknown relationship {:?}",
                record.source_id,
                record.target_id,
                record.relationship_type
            );
            self.skipped_edges += 1;
            return false;
        };
        if !self.node_types.contains_key(&record.source_id)
            || !self.node_types.contains_key(&record.target_id)
        {
            log::debug!(
                "Skipping edge {} -> {}: endpoint not in snapshot",
                record.source_id,
                record.target_id
            );
            self.skipped_edges += 1;
            return false;
        }

        self.typed
            .entry(record.source_id.clone())
            .or_default()
            .push((record.target_id.clone(), relationship));

        // Self-edges stay in the typed view only.
        if record.source_id != record.target_id {
            self.neighbors
                .entry(record.source_id.clone())
                .or_default()
                .insert(record.target_id.clone());
            self.neighbors
                .entry(record.target_id.clone())
                .or_default()
                .insert(record.source_id.clone());
        }

        self.edge_count += 1;
        true
    }

    /// Record the content of a belief node. Returns false when `record.id` is
    /// not a belief node of this snapshot.
    pub fn add_belief(&mut self, record: &BeliefRecord) -> bool {
        if self.node_types.get(&record.id) != Some(&NodeType::Belief) {
            log::debug!("Skipping belief {}: not a belief node in snapshot", record.id);
            return false;
        }
        self.beliefs.insert(record.id.clone(), record.clone());
        true
    }

    /// Number of nodes whose confidence or intensity had to be clamped.
    pub fn clamped(&self) -> usize {
        self.clamped_nodes
    }

    /// Number of records rejected so far (nodes, edges).
    pub fn skipped(&self) -> (usize, usize) {
        (self.skipped_nodes, self.skipped_edges)
    }

    /// Finish the snapshot, stamping it with the current time.
    pub fn build(self) -> Snapshot {
        let adjacency: Adjacency = self
            .neighbors
            .into_iter()
            .map(|(id, set)| (id, set.into_iter().collect()))
            .collect();

        Snapshot {
            adjacency,
            typed_adjacency: self.typed,
            node_weights: self.node_weights,
            node_types: self.node_types,
            beliefs: self.beliefs.into_values().collect(),
            edge_count: self.edge_count,
            extracted_at: Instant::now(),
            extracted_at_micros: now_micros(),
        }
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}
