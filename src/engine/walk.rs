//! Weighted stochastic ("dream") walks with optional Gaussian perturbation.

use std::collections::HashMap;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::Normal;
use serde::Serialize;

use crate::graph::Adjacency;
use crate::types::{
    AnalyticsError, AnalyticsResult, NodeId, NodeType, PERTURBED_WEIGHT_FLOOR,
    UNKNOWN_NODE_WEIGHT,
};

/// Parameters for a walk.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkParams {
    /// Maximum number of hops.
    pub steps: usize,
    /// Standard deviation of the noise added to neighbor weights, if any.
    pub quantum_delta: Option<f64>,
}

impl Default for WalkParams {
    fn default() -> Self {
        Self {
            steps: 10,
            quantum_delta: None,
        }
    }
}

impl WalkParams {
    /// Reject out-of-domain parameters.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if let Some(delta) = self.quantum_delta {
            if !(delta.is_finite() && delta >= 0.0) {
                return Err(AnalyticsError::invalid(
                    "quantum_delta",
                    format!("must be non-negative and finite, got {delta}"),
                ));
            }
        }
        Ok(())
    }
}

/// Result of a walk.
#[derive(Debug, Clone, Serialize)]
pub struct WalkResult {
    /// Visited nodes, starting node first. Nodes may repeat.
    pub path: Vec<NodeId>,
    /// Type of each node in `path`.
    pub node_types: Vec<NodeType>,
    /// Sum of the weights of every node in `path`.
    pub total_weight: f64,
    /// Whether neighbor weights were perturbed.
    pub perturbed: bool,
}

/// Walk up to `steps` hops from `start`, picking each next node with probability
/// proportional to its weight.
///
/// With `quantum_delta`, every candidate weight gets zero-mean Gaussian noise
/// and is floored at 0.01 before normalization. Neighbors missing from
/// `node_weights` weigh 0.1. The walk stops early at a node without neighbors.
pub fn stochastic_walk<R: Rng + ?Sized>(
    adjacency: &Adjacency,
    node_weights: &HashMap<NodeId, f64>,
    node_types: &HashMap<NodeId, NodeType>,
    start: &str,
    params: &WalkParams,
    rng: &mut R,
) -> AnalyticsResult<WalkResult> {
    params.validate()?;
    if !adjacency.contains_key(start) {
        return Err(AnalyticsError::NodeNotFound(start.to_string()));
    }

    let type_of = |id: &str| {
        node_types
            .get(id)
            .copied()
            .ok_or_else(|| AnalyticsError::NodeNotFound(id.to_string()))
    };
    let weight_of = |id: &str| node_weights.get(id).copied().unwrap_or(UNKNOWN_NODE_WEIGHT);

    let noise = params
        .quantum_delta
        .map(|delta| {
            Normal::new(0.0, delta)
                .map_err(|e| AnalyticsError::invalid("quantum_delta", e.to_string()))
        })
        .transpose()?;

    let mut path = vec![start.to_string()];
    let mut types = vec![type_of(start)?];
    let mut total_weight = weight_of(start);
    let mut current = start;

    for _ in 0..params.steps {
        let neighbors = adjacency.get(current).map(Vec::as_slice).unwrap_or(&[]);
        if neighbors.is_empty() {
            break;
        }

        let weights: Vec<f64> = neighbors
            .iter()
            .map(|nb| {
                let w = weight_of(nb.as_str());
                match &noise {
                    Some(dist) => (w + dist.sample(rng)).max(PERTURBED_WEIGHT_FLOOR),
                    None => w,
                }
            })
            .collect();

        let choice = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(rng),
            // Every candidate weighs zero: fall back to a uniform draw.
            Err(_) => rng.gen_range(0..neighbors.len()),
        };

        let next = neighbors[choice].as_str();
        types.push(type_of(next)?);
        total_weight += weight_of(next);
        path.push(next.to_string());
        current = next;
    }

    Ok(WalkResult {
        path,
        node_types: types,
        total_weight,
        perturbed: params.quantum_delta.is_some(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct Fixture {
        adjacency: Adjacency,
        weights: HashMap<NodeId, f64>,
        types: HashMap<NodeId, NodeType>,
    }

    fn fixture() -> Fixture {
        let mut adjacency = Adjacency::new();
        adjacency.insert("hub".into(), vec!["heavy".into(), "light".into()]);
        adjacency.insert("heavy".into(), vec!["hub".into()]);
        adjacency.insert("light".into(), vec!["hub".into()]);
        adjacency.insert("island".into(), vec![]);

        let weights = [("hub", 0.5), ("heavy", 0.9), ("light", 0.0), ("island", 0.4)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        let types = [
            ("hub", NodeType::Concept),
            ("heavy", NodeType::Memory),
            ("light", NodeType::Emotion),
            ("island", NodeType::Goal),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
        Fixture {
            adjacency,
            weights,
            types,
        }
    }

    fn run(f: &Fixture, start: &str, params: WalkParams, seed: u64) -> WalkResult {
        let mut rng = StdRng::seed_from_u64(seed);
        stochastic_walk(&f.adjacency, &f.weights, &f.types, start, &params, &mut rng).unwrap()
    }

    #[test]
    fn zero_steps_returns_start() {
        let f = fixture();
        let result = run(
            &f,
            "hub",
            WalkParams {
                steps: 0,
                quantum_delta: None,
            },
            1,
        );
        assert_eq!(result.path, vec!["hub".to_string()]);
        assert_eq!(result.node_types, vec![NodeType::Concept]);
        assert!((result.total_weight - 0.5).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_neighbor_is_never_chosen_without_noise() {
        let f = fixture();
        let result = run(&f, "hub", WalkParams::default(), 7);
        assert_eq!(result.path.len(), 11);
        assert!(!result.path.contains(&"light".to_string()));
        assert!(!result.perturbed);
        // Alternates hub, heavy, hub, ...
        let expected_weight = 6.0 * 0.5 + 5.0 * 0.9;
        assert!((result.total_weight - expected_weight).abs() < 1e-9);
    }

    #[test]
    fn perturbation_floors_weights() {
        // With the 0.01 floor even the zero-weight neighbor becomes reachable.
        let f = fixture();
        let params = WalkParams {
            steps: 2000,
            quantum_delta: Some(0.0),
        };
        let result = run(&f, "hub", params, 3);
        assert!(result.perturbed);
        assert!(result.path.contains(&"light".to_string()));
    }

    #[test]
    fn seeded_walks_are_reproducible() {
        let f = fixture();
        let params = WalkParams {
            steps: 25,
            quantum_delta: Some(0.3),
        };
        let a = run(&f, "hub", params.clone(), 42);
        let b = run(&f, "hub", params, 42);
        assert_eq!(a.path, b.path);
        assert_eq!(a.node_types.len(), a.path.len());
    }

    #[test]
    fn dead_end_stops_early() {
        let f = fixture();
        let result = run(&f, "island", WalkParams::default(), 9);
        assert_eq!(result.path, vec!["island".to_string()]);
    }

    #[test]
    fn rejects_unknown_start_and_negative_noise() {
        let f = fixture();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            stochastic_walk(
                &f.adjacency,
                &f.weights,
                &f.types,
                "nowhere",
                &WalkParams::default(),
                &mut rng
            ),
            Err(AnalyticsError::NodeNotFound(_))
        ));
        let bad = WalkParams {
            steps: 3,
            quantum_delta: Some(-0.1),
        };
        assert!(
            stochastic_walk(&f.adjacency, &f.weights, &f.types, "hub", &bad, &mut rng).is_err()
        );
    }
}
