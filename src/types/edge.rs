//! Relationship labels and the edge record fetched from the graph store.

use serde::{Deserialize, Serialize};

/// The type of relationship carried by a directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// The source brought the target about.
    Caused,
    /// The source made the target possible.
    Enabled,
    /// The source stopped the target from happening.
    Prevented,
    /// The source anticipated the target.
    Predicted,
    /// The source provides evidence for the target.
    Supports,
    /// The source conflicts with the target.
    Contradicts,
    /// Generic association.
    RelatesTo,
    /// The source belongs to a larger target.
    PartOf,
    /// The source was inferred from the target.
    DerivedFrom,
    /// Co-occurrence without a stated semantics.
    AssociatedWith,
}

/// Relationship types followed by causal tracing unless overridden.
pub const CAUSAL_TYPES: [RelationshipType; 4] = [
    RelationshipType::Caused,
    RelationshipType::Enabled,
    RelationshipType::Prevented,
    RelationshipType::Predicted,
];

impl RelationshipType {
    /// All relationship types, in declaration order.
    pub const ALL: [RelationshipType; 10] = [
        Self::Caused,
        Self::Enabled,
        Self::Prevented,
        Self::Predicted,
        Self::Supports,
        Self::Contradicts,
        Self::RelatesTo,
        Self::PartOf,
        Self::DerivedFrom,
        Self::AssociatedWith,
    ];

    /// Canonical store label for this relationship type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Caused => "CAUSED",
            Self::Enabled => "ENABLED",
            Self::Prevented => "PREVENTED",
            Self::Predicted => "PREDICTED",
            Self::Supports => "SUPPORTS",
            Self::Contradicts => "CONTRADICTS",
            Self::RelatesTo => "RELATES_TO",
            Self::PartOf => "PART_OF",
            Self::DerivedFrom => "DERIVED_FROM",
            Self::AssociatedWith => "ASSOCIATED_WITH",
        }
    }

    /// Parse a relationship type from a store label (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_uppercase().as_str() {
            "CAUSED" => Some(Self::Caused),
            "ENABLED" => Some(Self::Enabled),
            "PREVENTED" => Some(Self::Prevented),
            "PREDICTED" => Some(Self::Predicted),
            "SUPPORTS" => Some(Self::Supports),
            "CONTRADICTS" => Some(Self::Contradicts),
            "RELATES_TO" | "RELATESTO" => Some(Self::RelatesTo),
            "PART_OF" | "PARTOF" => Some(Self::PartOf),
            "DERIVED_FROM" | "DERIVEDFROM" => Some(Self::DerivedFrom),
            "ASSOCIATED_WITH" | "ASSOCIATEDWITH" => Some(Self::AssociatedWith),
            _ => None,
        }
    }

    /// Whether this relationship expresses cause and effect.
    pub fn is_causal(&self) -> bool {
        matches!(
            self,
            Self::Caused | Self::Enabled | Self::Prevented | Self::Predicted
        )
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A directed edge as returned by `fetch_edges`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    /// Origin of the relationship.
    pub source_id: String,
    /// Destination of the relationship.
    pub target_id: String,
    /// Raw store label.
    pub relationship_type: String,
}

impl EdgeRecord {
    /// Create an edge record.
    pub fn new(
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        relationship_type: impl Into<String>,
    ) -> Self {
        Self {
            source_id: source_id.into(),
            target_id: target_id.into(),
            relationship_type: relationship_type.into(),
        }
    }
}
