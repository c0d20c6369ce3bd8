//! Wave-based spreading activation from seed nodes.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::graph::Adjacency;
use crate::types::{AnalyticsError, AnalyticsResult, NodeId};

/// Parameters for spreading activation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationParams {
    /// Activation assigned to every seed.
    pub initial: f64,
    /// Fraction of a node's activation passed to each neighbor, in (0, 1].
    pub decay: f64,
    /// Emissions and results below this level are dropped.
    pub threshold: f64,
    /// Maximum number of reached (and returned) nodes.
    pub max_nodes: usize,
}

impl Default for ActivationParams {
    fn default() -> Self {
        Self {
            initial: 1.0,
            decay: 0.6,
            threshold: 0.1,
            max_nodes: 50,
        }
    }
}

impl ActivationParams {
    /// Reject out-of-domain parameters.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.initial.is_finite() && self.initial > 0.0) {
            return Err(AnalyticsError::invalid(
                "initial",
                format!("must be positive and finite, got {}", self.initial),
            ));
        }
        if !(self.decay > 0.0 && self.decay <= 1.0) {
            return Err(AnalyticsError::invalid(
                "decay",
                format!("must be in (0, 1], got {}", self.decay),
            ));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(AnalyticsError::invalid(
                "threshold",
                format!("must be non-negative and finite, got {}", self.threshold),
            ));
        }
        if self.max_nodes == 0 {
            return Err(AnalyticsError::invalid("max_nodes", "must be at least 1"));
        }
        Ok(())
    }
}

/// A node reached by activation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivatedNode {
    pub id: NodeId,
    pub activation: f64,
}

/// Result of spreading activation.
#[derive(Debug, Clone, Serialize)]
pub struct ActivationResult {
    /// Nodes at or above threshold, highest activation first (ties by id).
    pub activated: Vec<ActivatedNode>,
    /// Visitation order; each node appears once, at first arrival.
    pub path: Vec<NodeId>,
}

impl ActivationResult {
    /// Activation of one node, if it made the cut.
    pub fn activation(&self, id: &str) -> Option<f64> {
        self.activated
            .iter()
            .find(|n| n.id == id)
            .map(|n| n.activation)
    }

    /// Activations as a map.
    pub fn as_map(&self) -> HashMap<NodeId, f64> {
        self.activated
            .iter()
            .map(|n| (n.id.clone(), n.activation))
            .collect()
    }
}

/// Spread activation outward from `seeds` in waves.
///
/// Each wave expands the frontier in arrival order. An expanding node whose
/// emission (`activation * decay`) reaches `threshold` sends it to every
/// neighbor that has not expanded yet. Receipts add up across sources and across
/// waves until the receiver expands, so two frontier nodes that neighbor each
/// other still feed one another. A node expands at most once. Newly reached
/// nodes form the next frontier; reaching stops once `max_nodes` distinct nodes
/// have been reached.
pub fn spread_activation(
    adjacency: &Adjacency,
    seeds: &[NodeId],
    params: &ActivationParams,
) -> AnalyticsResult<ActivationResult> {
    params.validate()?;
    if seeds.is_empty() {
        return Err(AnalyticsError::invalid("seeds", "at least one seed is required"));
    }

    let mut activation: HashMap<&str, f64> = HashMap::new();
    let mut reached: HashSet<&str> = HashSet::new();
    let mut expanded: HashSet<&str> = HashSet::new();
    let mut path: Vec<NodeId> = Vec::new();
    let mut frontier: Vec<&str> = Vec::new();

    for seed in seeds {
        if !adjacency.contains_key(seed) {
            return Err(AnalyticsError::NodeNotFound(seed.clone()));
        }
        if reached.len() >= params.max_nodes || !reached.insert(seed.as_str()) {
            continue;
        }
        activation.insert(seed.as_str(), params.initial);
        path.push(seed.clone());
        frontier.push(seed.as_str());
    }

    let mut waves = 0;
    let mut capped = false;
    while !frontier.is_empty() && !capped {
        waves += 1;
        let mut next: Vec<&str> = Vec::new();

        'frontier: for &node in &frontier {
            expanded.insert(node);
            let emitted = activation[node] * params.decay;
            if emitted < params.threshold {
                continue;
            }
            let neighbors = adjacency.get(node).map(Vec::as_slice).unwrap_or(&[]);
            for neighbor in neighbors {
                let neighbor = neighbor.as_str();
                if expanded.contains(neighbor) {
                    continue;
                }
                if !reached.contains(neighbor) {
                    if reached.len() >= params.max_nodes {
                        capped = true;
                        break 'frontier;
                    }
                    reached.insert(neighbor);
                    next.push(neighbor);
                    path.push(neighbor.to_string());
                }
                *activation.entry(neighbor).or_insert(0.0) += emitted;
            }
        }

        frontier = next;
    }

    let mut activated: Vec<ActivatedNode> = activation
        .into_iter()
        .filter(|(_, a)| *a >= params.threshold)
        .map(|(id, a)| ActivatedNode {
            id: id.to_string(),
            activation: a,
        })
        .collect();
    activated.sort_by(|a, b| {
        b.activation
            .partial_cmp(&a.activation)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    activated.truncate(params.max_nodes);

    log::debug!(
        "Activation from {} seeds: {} waves, {} reached, {} above threshold",
        seeds.len(),
        waves,
        path.len(),
        activated.len()
    );

    Ok(ActivationResult { activated, path })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Symmetric view of A->{B,C}, B->D.
    fn sample() -> Adjacency {
        let mut adj = Adjacency::new();
        adj.insert("A".into(), vec!["B".into(), "C".into()]);
        adj.insert("B".into(), vec!["A".into(), "D".into()]);
        adj.insert("C".into(), vec!["A".into()]);
        adj.insert("D".into(), vec!["B".into()]);
        adj
    }

    fn seeds(ids: &[&str]) -> Vec<NodeId> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decays_per_hop() {
        let result =
            spread_activation(&sample(), &seeds(&["A"]), &ActivationParams::default()).unwrap();
        let map = result.as_map();
        assert_eq!(map.len(), 4);
        assert!((map["A"] - 1.0).abs() < 1e-12);
        assert!((map["B"] - 0.6).abs() < 1e-12);
        assert!((map["C"] - 0.6).abs() < 1e-12);
        assert!((map["D"] - 0.36).abs() < 1e-12);
        assert_eq!(result.path, seeds(&["A", "B", "C", "D"]));
        assert_eq!(result.activated[0].id, "A");
    }

    #[test]
    fn threshold_cuts_deep_nodes() {
        let params = ActivationParams {
            threshold: 0.4,
            ..ActivationParams::default()
        };
        let result = spread_activation(&sample(), &seeds(&["A"]), &params).unwrap();
        assert_eq!(result.activation("D"), None);
        assert_eq!(result.activated.len(), 3);
    }

    #[test]
    fn same_wave_receipts_accumulate() {
        // Two seeds both reach X in the first wave.
        let mut adj = Adjacency::new();
        adj.insert("s1".into(), vec!["x".into()]);
        adj.insert("s2".into(), vec!["x".into()]);
        adj.insert("x".into(), vec!["s1".into(), "s2".into()]);
        let result =
            spread_activation(&adj, &seeds(&["s1", "s2"]), &ActivationParams::default()).unwrap();
        assert!((result.activation("x").unwrap() - 1.2).abs() < 1e-12);
        assert_eq!(result.path, seeds(&["s1", "s2", "x"]));
    }

    #[test]
    fn frontier_peers_feed_each_other() {
        // Triangle: B and C are both reached in wave one and neighbor each other.
        let mut adj = Adjacency::new();
        adj.insert("A".into(), vec!["B".into(), "C".into()]);
        adj.insert("B".into(), vec!["A".into(), "C".into()]);
        adj.insert("C".into(), vec!["A".into(), "B".into()]);
        let result =
            spread_activation(&adj, &seeds(&["A"]), &ActivationParams::default()).unwrap();
        let map = result.as_map();
        assert!((map["A"] - 1.0).abs() < 1e-12);
        assert!((map["B"] - 0.6).abs() < 1e-12);
        assert!((map["C"] - 0.96).abs() < 1e-12);
        assert_eq!(result.path, seeds(&["A", "B", "C"]));
        assert_eq!(result.activated[0].id, "A");
        assert_eq!(result.activated[1].id, "C");
    }

    #[test]
    fn max_nodes_caps_visits() {
        let params = ActivationParams {
            max_nodes: 2,
            ..ActivationParams::default()
        };
        let result = spread_activation(&sample(), &seeds(&["A"]), &params).unwrap();
        assert_eq!(result.path, seeds(&["A", "B"]));
        assert_eq!(result.activated.len(), 2);
    }

    #[test]
    fn rejects_unknown_or_missing_seeds() {
        let adj = sample();
        assert!(matches!(
            spread_activation(&adj, &seeds(&["Z"]), &ActivationParams::default()),
            Err(AnalyticsError::NodeNotFound(_))
        ));
        assert!(matches!(
            spread_activation(&adj, &[], &ActivationParams::default()),
            Err(AnalyticsError::InvalidParameter { name: "seeds", .. })
        ));
        let bad = ActivationParams {
            decay: 1.5,
            ..ActivationParams::default()
        };
        assert!(spread_activation(&adj, &seeds(&["A"]), &bad).is_err());
    }
}
