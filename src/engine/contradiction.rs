//! Contradiction candidates: structural (graph connections between beliefs)
//! and semantic (lexical overlap pending external confirmation).

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::graph::TypedAdjacency;
use crate::types::{AnalyticsError, AnalyticsResult, BeliefRecord, NodeId, RelationshipType};

/// How a contradiction candidate was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    /// The two beliefs are connected in the graph.
    Structural,
    /// The two beliefs share most of their wording.
    Semantic,
}

/// A pair of beliefs flagged as possibly conflicting. `node1_id < node2_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContradictionPair {
    pub node1_id: NodeId,
    pub node2_id: NodeId,
    pub content1: String,
    pub content2: String,
    /// Mean confidence of the two beliefs.
    pub confidence: f64,
    pub method: DetectionMethod,
}

/// A lexically similar belief pair awaiting confirmation. `node1_id < node2_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticCandidate {
    pub node1_id: NodeId,
    pub node2_id: NodeId,
    pub similarity: f64,
}

/// Thresholds for semantic candidate generation.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticParams {
    /// Minimum Jaccard similarity, in [0, 1].
    pub similarity_threshold: f64,
    /// Beliefs below this confidence are ignored, in [0, 1].
    pub confidence_threshold: f64,
}

impl Default for SemanticParams {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            confidence_threshold: 0.6,
        }
    }
}

impl SemanticParams {
    /// Reject out-of-domain thresholds.
    pub fn validate(&self) -> AnalyticsResult<()> {
        for (name, value) in [
            ("similarity_threshold", self.similarity_threshold),
            ("confidence_threshold", self.confidence_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AnalyticsError::invalid(
                    name,
                    format!("must be in [0, 1], got {value}"),
                ));
            }
        }
        Ok(())
    }
}

fn canonical<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Every typed connection from one belief to another is a candidate.
///
/// An empty `relationship_filter` lets any connection count; otherwise only
/// connections of the listed types qualify. Pairs are deduplicated on
/// `(min_id, max_id)` and returned in that order.
pub fn structural_contradictions(
    beliefs: &[BeliefRecord],
    typed_adjacency: &TypedAdjacency,
    relationship_filter: &[RelationshipType],
) -> Vec<ContradictionPair> {
    let by_id: HashMap<&str, &BeliefRecord> =
        beliefs.iter().map(|b| (b.id.as_str(), b)).collect();
    let filter: HashSet<RelationshipType> = relationship_filter.iter().copied().collect();
    let mut pairs: BTreeSet<(&str, &str)> = BTreeSet::new();

    for belief in beliefs {
        let Some(edges) = typed_adjacency.get(&belief.id) else {
            continue;
        };
        for (neighbor, relationship) in edges {
            if neighbor == &belief.id || !by_id.contains_key(neighbor.as_str()) {
                continue;
            }
            if !filter.is_empty() && !filter.contains(relationship) {
                continue;
            }
            pairs.insert(canonical(&belief.id, neighbor));
        }
    }

    pairs
        .into_iter()
        .map(|(a, b)| {
            let (first, second) = (by_id[a], by_id[b]);
            ContradictionPair {
                node1_id: a.to_string(),
                node2_id: b.to_string(),
                content1: first.content.clone(),
                content2: second.content.clone(),
                confidence: (first.confidence + second.confidence) / 2.0,
                method: DetectionMethod::Structural,
            }
        })
        .collect()
}

fn token_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|t| {
            t.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

/// Jaccard similarity of the lowercased word sets of two texts.
/// Two texts without any words have similarity 0.0.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    jaccard(&token_set(a), &token_set(b))
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// Pairs of confident beliefs whose wording overlaps enough to warrant a
/// closer look. Most similar first, then by id.
pub fn semantic_candidates(
    beliefs: &[BeliefRecord],
    params: &SemanticParams,
) -> AnalyticsResult<Vec<SemanticCandidate>> {
    params.validate()?;

    let confident: Vec<(&BeliefRecord, HashSet<String>)> = beliefs
        .iter()
        .filter(|b| b.confidence >= params.confidence_threshold)
        .map(|b| (b, token_set(&b.content)))
        .collect();

    let mut candidates = Vec::new();
    for (i, (first, first_tokens)) in confident.iter().enumerate() {
        for (second, second_tokens) in &confident[i + 1..] {
            if first.id == second.id {
                continue;
            }
            let similarity = jaccard(first_tokens, second_tokens);
            if similarity >= params.similarity_threshold {
                let (a, b) = canonical(&first.id, &second.id);
                candidates.push(SemanticCandidate {
                    node1_id: a.to_string(),
                    node2_id: b.to_string(),
                    similarity,
                });
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.node1_id.cmp(&b.node1_id))
            .then_with(|| a.node2_id.cmp(&b.node2_id))
    });
    Ok(candidates)
}

/// Expand semantic candidates into full pairs for downstream confirmation.
pub fn semantic_pairs(
    candidates: &[SemanticCandidate],
    beliefs: &[BeliefRecord],
) -> AnalyticsResult<Vec<ContradictionPair>> {
    let by_id: HashMap<&str, &BeliefRecord> =
        beliefs.iter().map(|b| (b.id.as_str(), b)).collect();
    candidates
        .iter()
        .map(|c| {
            let first = by_id
                .get(c.node1_id.as_str())
                .ok_or_else(|| AnalyticsError::NodeNotFound(c.node1_id.clone()))?;
            let second = by_id
                .get(c.node2_id.as_str())
                .ok_or_else(|| AnalyticsError::NodeNotFound(c.node2_id.clone()))?;
            Ok(ContradictionPair {
                node1_id: c.node1_id.clone(),
                node2_id: c.node2_id.clone(),
                content1: first.content.clone(),
                content2: second.content.clone(),
                confidence: (first.confidence + second.confidence) / 2.0,
                method: DetectionMethod::Semantic,
            })
        })
        .collect()
}
