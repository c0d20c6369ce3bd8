//! Personalized power-iteration importance ranking.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::graph::Adjacency;
use crate::types::{AnalyticsError, AnalyticsResult, NodeId};

/// Parameters for an importance computation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceParams {
    /// Probability of following an edge rather than teleporting, in (0, 1).
    pub damping: f64,
    /// Upper bound on power iterations.
    pub max_iterations: usize,
    /// L1 change between iterations below which the ranking is converged.
    pub tolerance: f64,
}

impl Default for ImportanceParams {
    fn default() -> Self {
        Self {
            damping: 0.85,
            max_iterations: 20,
            tolerance: 1e-6,
        }
    }
}

impl ImportanceParams {
    /// Reject out-of-domain parameters.
    pub fn validate(&self) -> AnalyticsResult<()> {
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(AnalyticsError::invalid(
                "damping",
                format!("must be in (0, 1), got {}", self.damping),
            ));
        }
        if self.max_iterations == 0 {
            return Err(AnalyticsError::invalid(
                "max_iterations",
                "must be at least 1",
            ));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(AnalyticsError::invalid(
                "tolerance",
                format!("must be positive and finite, got {}", self.tolerance),
            ));
        }
        Ok(())
    }
}

/// Result of an importance computation.
#[derive(Debug, Clone, Serialize)]
pub struct ImportanceResult {
    /// Score per node, divided by the maximum so the top node scores 1.0.
    pub scores: HashMap<NodeId, f64>,
    /// Iterations actually run.
    pub iterations: usize,
    /// Whether the L1 change dropped below tolerance.
    pub converged: bool,
}

impl ImportanceResult {
    /// Score of one node.
    pub fn score(&self, id: &str) -> Option<f64> {
        self.scores.get(id).copied()
    }

    /// At most `limit` nodes by descending score; equal scores are ordered by
    /// ascending node id.
    pub fn top_k(&self, limit: usize) -> Vec<(NodeId, f64)> {
        let mut ranked: Vec<(NodeId, f64)> = self
            .scores
            .iter()
            .map(|(id, score)| (id.clone(), *score))
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        ranked.truncate(limit);
        ranked
    }
}

/// Power-iteration ranking over `adjacency`.
///
/// `new[i] = d * Σ_{j→i} score[j] / outdeg[j] + (1 - d) * teleport[i]`
///
/// `teleport` is the normalized personalization vector when given, otherwise
/// uniform. Nodes without out-edges keep their mass: it is not spread back over
/// the graph, so raw scores may sum to less than one. The final scores are
/// divided by their maximum.
pub fn compute_importance(
    adjacency: &Adjacency,
    personalization: Option<&HashMap<NodeId, f64>>,
    params: &ImportanceParams,
) -> AnalyticsResult<ImportanceResult> {
    params.validate()?;

    // Keys plus any neighbor that is not itself a key.
    let mut all: BTreeSet<&str> = adjacency.keys().map(String::as_str).collect();
    for neighbors in adjacency.values() {
        all.extend(neighbors.iter().map(String::as_str));
    }
    let ids: Vec<&str> = all.into_iter().collect();
    let n = ids.len();

    if n == 0 {
        return Ok(ImportanceResult {
            scores: HashMap::new(),
            iterations: 0,
            converged: true,
        });
    }

    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let out_links: Vec<Vec<usize>> = ids
        .iter()
        .map(|id| {
            adjacency
                .get(*id)
                .map(|ns| ns.iter().map(|nb| index[nb.as_str()]).collect())
                .unwrap_or_default()
        })
        .collect();

    let teleport = teleport_vector(&ids, &index, personalization)?;

    let d = params.damping;
    let mut scores = vec![1.0 / n as f64; n];
    let mut next = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < params.max_iterations {
        iterations += 1;

        for (slot, t) in next.iter_mut().zip(&teleport) {
            *slot = (1.0 - d) * t;
        }
        for (j, links) in out_links.iter().enumerate() {
            if links.is_empty() {
                continue;
            }
            let share = d * scores[j] / links.len() as f64;
            for &i in links {
                next[i] += share;
            }
        }

        let delta: f64 = scores.iter().zip(&next).map(|(a, b)| (a - b).abs()).sum();
        std::mem::swap(&mut scores, &mut next);
        if delta < params.tolerance {
            converged = true;
            break;
        }
    }

    let max = scores.iter().copied().fold(0.0f64, f64::max);
    let scores = ids
        .iter()
        .zip(&scores)
        .map(|(id, s)| {
            let normalized = if max > 0.0 { s / max } else { 0.0 };
            (id.to_string(), normalized)
        })
        .collect();

    log::debug!(
        "Importance over {} nodes: {} iterations, converged={}",
        n,
        iterations,
        converged
    );

    Ok(ImportanceResult {
        scores,
        iterations,
        converged,
    })
}

fn teleport_vector(
    ids: &[&str],
    index: &HashMap<&str, usize>,
    personalization: Option<&HashMap<NodeId, f64>>,
) -> AnalyticsResult<Vec<f64>> {
    let n = ids.len();
    let Some(weights) = personalization else {
        return Ok(vec![1.0 / n as f64; n]);
    };

    let mut teleport = vec![0.0; n];
    for (id, &w) in weights {
        if !(w.is_finite() && w >= 0.0) {
            return Err(AnalyticsError::invalid(
                "personalization",
                format!("weight for {id} must be finite and non-negative, got {w}"),
            ));
        }
        let i = index
            .get(id.as_str())
            .ok_or_else(|| AnalyticsError::NodeNotFound(id.clone()))?;
        teleport[*i] = w;
    }

    let total: f64 = teleport.iter().sum();
    if total <= 0.0 {
        return Err(AnalyticsError::invalid(
            "personalization",
            "weights must have a positive sum",
        ));
    }
    for t in &mut teleport {
        *t /= total;
    }
    Ok(teleport)
}
