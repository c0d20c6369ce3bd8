//! Causal chain tracing (bounded BFS over typed edges).

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::types::{AnalyticsError, AnalyticsResult, NodeId, RelationshipType};

use super::TypedAdjacency;

/// How discovered causal edges are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalDirection {
    /// Report edges as `(source, relationship, target)`.
    Forward,
    /// Report edges as `(target, relationship, source)`.
    Backward,
}

impl TraversalDirection {
    /// Parse a direction name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "forward" => Some(Self::Forward),
            "backward" => Some(Self::Backward),
            _ => None,
        }
    }
}

/// One cause/effect link in a traced chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CausalLink {
    pub source: NodeId,
    pub relationship: RelationshipType,
    pub target: NodeId,
}

/// Breadth-first walk from `start` along outgoing edges whose relationship is in
/// `causal_types`, at most `max_depth` hops, visiting each node once.
///
/// The same outgoing edges are followed in both directions; `Backward` only
/// flips how each discovered edge is reported.
pub fn trace_causal_chain(
    typed_adjacency: &TypedAdjacency,
    start: &str,
    direction: TraversalDirection,
    causal_types: &[RelationshipType],
    max_depth: usize,
) -> AnalyticsResult<Vec<CausalLink>> {
    if !typed_adjacency.contains_key(start) {
        return Err(AnalyticsError::NodeNotFound(start.to_string()));
    }

    let allowed: HashSet<RelationshipType> = causal_types.iter().copied().collect();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut chain: Vec<CausalLink> = Vec::new();
    let mut queue: VecDeque<(&str, usize)> = VecDeque::new();

    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let Some(edges) = typed_adjacency.get(current) else {
            continue;
        };

        for (neighbor, relationship) in edges {
            if !allowed.contains(relationship) || visited.contains(neighbor.as_str()) {
                continue;
            }
            visited.insert(neighbor.as_str());

            let link = match direction {
                TraversalDirection::Forward => CausalLink {
                    source: current.to_string(),
                    relationship: *relationship,
                    target: neighbor.clone(),
                },
                TraversalDirection::Backward => CausalLink {
                    source: neighbor.clone(),
                    relationship: *relationship,
                    target: current.to_string(),
                },
            };
            chain.push(link);
            queue.push_back((neighbor.as_str(), depth + 1));
        }
    }

    Ok(chain)
}
