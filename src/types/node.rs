//! Node labels and the node/belief records fetched from the graph store.

use serde::{Deserialize, Serialize};

/// Default confidence and intensity when the store leaves them unset.
pub const DEFAULT_ATTRIBUTE: f64 = 0.5;

/// The kind of entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// A held proposition; the subject of contradiction detection.
    Belief,
    /// A recorded experience.
    Memory,
    /// An abstract idea.
    Concept,
    /// A person, place or thing.
    Entity,
    /// Something that happened.
    Event,
    /// An affective state.
    Emotion,
    /// Something the agent wants.
    Goal,
    /// A conclusion crystallized from other nodes.
    Insight,
}

impl NodeType {
    /// All node types, in declaration order.
    pub const ALL: [NodeType; 8] = [
        Self::Belief,
        Self::Memory,
        Self::Concept,
        Self::Entity,
        Self::Event,
        Self::Emotion,
        Self::Goal,
        Self::Insight,
    ];

    /// Return a human-readable name for this node type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Belief => "belief",
            Self::Memory => "memory",
            Self::Concept => "concept",
            Self::Entity => "entity",
            Self::Event => "event",
            Self::Emotion => "emotion",
            Self::Goal => "goal",
            Self::Insight => "insight",
        }
    }

    /// Parse a node type from a store label (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "belief" => Some(Self::Belief),
            "memory" => Some(Self::Memory),
            "concept" => Some(Self::Concept),
            "entity" => Some(Self::Entity),
            "event" => Some(Self::Event),
            "emotion" => Some(Self::Emotion),
            "goal" => Some(Self::Goal),
            "insight" => Some(Self::Insight),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node as returned by `fetch_nodes`. Labels stay raw strings here; they are
/// resolved to [`NodeType`] when the snapshot is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Unique identifier.
    pub id: String,
    /// Store label.
    #[serde(rename = "type")]
    pub node_type: String,
    /// How certain the agent is about this node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    /// Emotional or salience intensity in [0, 1].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f64>,
    /// How many times this node has been retrieved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_count: Option<u64>,
}

impl NodeRecord {
    /// Create a record with only the required fields.
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            confidence: None,
            intensity: None,
            access_count: None,
        }
    }

    /// Set the confidence.
    pub fn confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    /// Set the intensity.
    pub fn intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Set the access count.
    pub fn access_count(mut self, count: u64) -> Self {
        self.access_count = Some(count);
        self
    }

    /// Derived node weight.
    ///
    /// Formula: 0.3 * confidence + 0.3 * intensity + 0.4 * min(access_count / 10, 1)
    ///
    /// Missing confidence and intensity default to 0.5, a missing access count to 0.
    /// Confidence and intensity are clamped to [0.0, 1.0].
    pub fn weight(&self) -> f64 {
        let confidence = self
            .confidence
            .unwrap_or(DEFAULT_ATTRIBUTE)
            .clamp(0.0, 1.0);
        let intensity = self.intensity.unwrap_or(DEFAULT_ATTRIBUTE).clamp(0.0, 1.0);
        let access = (self.access_count.unwrap_or(0) as f64 / 10.0).min(1.0);
        0.3 * confidence + 0.3 * intensity + 0.4 * access
    }
}

/// A belief as returned by `fetch_beliefs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefRecord {
    /// Node identifier.
    pub id: String,
    /// The proposition text.
    pub content: String,
    /// How strongly the belief is held.
    pub confidence: f64,
}

impl BeliefRecord {
    /// Create a belief record.
    pub fn new(id: impl Into<String>, content: impl Into<String>, confidence: f64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            confidence,
        }
    }
}
