//! Serializable graph document shared by the in-memory and JSON-file stores.

use serde::{Deserialize, Serialize};

use crate::types::{
    BeliefRecord, EdgeRecord, NodeRecord, NodeType, RelationshipType, StoreError, StoreResult,
    DEFAULT_ATTRIBUTE,
};

use super::EdgeProperties;

/// A node plus the free text the store keeps for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredNode {
    #[serde(flatten)]
    pub record: NodeRecord,
    /// Proposition text (beliefs) or description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// An edge plus its free-form properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredEdge {
    #[serde(flatten)]
    pub record: EdgeRecord,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub properties: EdgeProperties,
}

/// The whole graph as stored on disk or held in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    #[serde(default)]
    pub nodes: Vec<StoredNode>,
    #[serde(default)]
    pub edges: Vec<StoredEdge>,
}

impl GraphDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node without content.
    pub fn push_node(&mut self, record: NodeRecord) -> &mut Self {
        self.nodes.push(StoredNode {
            record,
            content: None,
        });
        self
    }

    /// Append a belief node with its proposition text.
    pub fn push_belief(
        &mut self,
        id: impl Into<String>,
        content: impl Into<String>,
        confidence: f64,
    ) -> &mut Self {
        self.nodes.push(StoredNode {
            record: NodeRecord::new(id, NodeType::Belief.name()).confidence(confidence),
            content: Some(content.into()),
        });
        self
    }

    /// Append an edge without properties.
    pub fn push_edge(
        &mut self,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship: RelationshipType,
    ) -> &mut Self {
        self.edges.push(StoredEdge {
            record: EdgeRecord::new(source_id, target_id, relationship.name()),
            properties: EdgeProperties::new(),
        });
        self
    }

    /// All node records.
    pub fn node_records(&self) -> Vec<NodeRecord> {
        self.nodes.iter().map(|n| n.record.clone()).collect()
    }

    /// All edge records.
    pub fn edge_records(&self) -> Vec<EdgeRecord> {
        self.edges.iter().map(|e| e.record.clone()).collect()
    }

    /// Belief nodes with confidence at or above `min_confidence`.
    pub fn beliefs(&self, min_confidence: Option<f64>) -> Vec<BeliefRecord> {
        self.nodes
            .iter()
            .filter(|n| NodeType::from_name(&n.record.node_type) == Some(NodeType::Belief))
            .map(|n| {
                BeliefRecord::new(
                    n.record.id.clone(),
                    n.content.clone().unwrap_or_default(),
                    n.record.confidence.unwrap_or(DEFAULT_ATTRIBUTE),
                )
            })
            .filter(|b| min_confidence.map_or(true, |min| b.confidence >= min))
            .collect()
    }

    /// Validate and append a new edge between existing nodes.
    pub fn insert_edge(
        &mut self,
        source_id: &str,
        target_id: &str,
        relationship: RelationshipType,
        properties: EdgeProperties,
    ) -> StoreResult<()> {
        for id in [source_id, target_id] {
            if !self.nodes.iter().any(|n| n.record.id == id) {
                return Err(StoreError::Query(format!("node {id} does not exist")));
            }
        }
        self.edges.push(StoredEdge {
            record: EdgeRecord::new(source_id, target_id, relationship.name()),
            properties,
        });
        Ok(())
    }
}
