//! CLI command implementations.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::{load_config, AnalyticsConfig};
use crate::engine::{ActivationParams, AnalyticsEngine};
use crate::graph::TraversalDirection;
use crate::store::{EdgeProperties, GraphDocument, JsonFileStore};
use crate::types::{AnalyticsError, AnalyticsResult, NodeId, NodeType, RelationshipType};

/// Build an engine over a JSON graph file, with an optional TOML config.
pub fn open_engine(
    graph: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
) -> AnalyticsResult<AnalyticsEngine> {
    let mut config = match config_path {
        Some(path) => load_config(path)?,
        None => AnalyticsConfig::default(),
    };
    if seed.is_some() {
        config.walk.seed = seed;
    }
    AnalyticsEngine::new(Arc::new(JsonFileStore::open(graph)), config)
}

fn render_json<T: Serialize + ?Sized>(value: &T) -> AnalyticsResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> AnalyticsResult<()> {
    println!("{}", render_json(value)?);
    Ok(())
}

/// Display snapshot statistics.
pub async fn cmd_info(engine: &AnalyticsEngine, json: bool) -> AnalyticsResult<()> {
    let snapshot = engine.refresh().await?;
    let extracted = chrono::DateTime::from_timestamp_micros(snapshot.extracted_at_micros() as i64)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default();

    if json {
        let types: serde_json::Map<String, serde_json::Value> = NodeType::ALL
            .iter()
            .map(|t| (t.name().to_string(), snapshot.nodes_of_type(*t).len().into()))
            .collect();
        print_json(&serde_json::json!({
            "nodes": snapshot.node_count(),
            "edges": snapshot.edge_count(),
            "extracted_at": extracted,
            "node_types": types,
        }))?;
    } else {
        println!("Nodes: {}", snapshot.node_count());
        println!("Edges: {}", snapshot.edge_count());
        println!("Extracted at: {}", extracted);
        println!("Node types:");
        for t in NodeType::ALL {
            let count = snapshot.nodes_of_type(t).len();
            if count > 0 {
                println!("  {}: {}", t.name(), count);
            }
        }
    }
    Ok(())
}

/// Rank nodes by importance.
pub async fn cmd_rank(engine: &AnalyticsEngine, limit: usize, json: bool) -> AnalyticsResult<()> {
    let result = engine.compute_importance(None).await?;
    let top = result.top_k(limit);
    let snapshot = engine.snapshot();
    let type_name = |id: &str| {
        snapshot
            .as_ref()
            .and_then(|s| s.node_type(id))
            .map(|t| t.name())
            .unwrap_or("unknown")
    };

    if json {
        let scores: Vec<serde_json::Value> = top
            .iter()
            .enumerate()
            .map(|(i, (id, score))| {
                serde_json::json!({
                    "rank": i + 1,
                    "node_id": id,
                    "score": score,
                    "type": type_name(id.as_str()),
                })
            })
            .collect();
        print_json(&serde_json::json!({
            "converged": result.converged,
            "iterations": result.iterations,
            "scores": scores,
        }))?;
    } else {
        println!(
            "Importance (converged: {}, iterations: {}):",
            result.converged, result.iterations
        );
        for (i, (id, score)) in top.iter().enumerate() {
            println!(
                "  #{:<3} {} ({}) [score: {:.6}]",
                i + 1,
                id,
                type_name(id.as_str()),
                score
            );
        }
    }
    Ok(())
}

/// Spread activation from seed nodes.
pub async fn cmd_activate(
    engine: &AnalyticsEngine,
    seeds: Vec<NodeId>,
    params: ActivationParams,
    json: bool,
) -> AnalyticsResult<()> {
    let result = engine.spread_activation(&seeds, Some(params)).await?;
    if json {
        print_json(&result)?;
    } else {
        println!("Activated {} nodes:", result.activated.len());
        for node in &result.activated {
            println!("  {} [{:.4}]", node.id, node.activation);
        }
        println!("Path: {}", result.path.join(" -> "));
    }
    Ok(())
}

/// List contradiction candidates.
pub async fn cmd_contradictions(
    engine: &AnalyticsEngine,
    semantic: bool,
    threshold: Option<f64>,
    json: bool,
) -> AnalyticsResult<()> {
    if semantic {
        let candidates = engine.semantic_contradiction_candidates(threshold).await?;
        if json {
            print_json(&candidates)?;
        } else {
            println!("{} semantic candidates:", candidates.len());
            for c in &candidates {
                println!("  {} <-> {} [similarity: {:.3}]", c.node1_id, c.node2_id, c.similarity);
            }
        }
    } else {
        let pairs = engine.detect_structural_contradictions().await?;
        if json {
            print_json(&pairs)?;
        } else {
            println!("{} structural candidates:", pairs.len());
            for p in &pairs {
                println!(
                    "  {} <-> {} [confidence: {:.2}]\n    {:?}\n    {:?}",
                    p.node1_id, p.node2_id, p.confidence, p.content1, p.content2
                );
            }
        }
    }
    Ok(())
}

/// Take a weighted random walk.
pub async fn cmd_walk(
    engine: &AnalyticsEngine,
    start: &str,
    steps: Option<usize>,
    quantum_delta: Option<f64>,
    json: bool,
) -> AnalyticsResult<()> {
    let result = engine.walk(start, steps, quantum_delta).await?;
    if json {
        print_json(&result)?;
    } else {
        println!(
            "Walk of {} hops (total weight: {:.3}, perturbed: {}):",
            result.path.len() - 1,
            result.total_weight,
            result.perturbed
        );
        for (id, t) in result.path.iter().zip(&result.node_types) {
            println!("  {} ({})", id, t);
        }
    }
    Ok(())
}

/// Trace a causal chain.
pub async fn cmd_chain(
    engine: &AnalyticsEngine,
    start: &str,
    direction: TraversalDirection,
    max_depth: Option<usize>,
    json: bool,
) -> AnalyticsResult<()> {
    let depth = max_depth.unwrap_or(engine.config().causal.max_depth);
    let chain = engine
        .trace_causal_chain_with_depth(start, direction, depth)
        .await?;
    if json {
        print_json(&chain)?;
    } else {
        println!("Causal chain from {} ({} links):", start, chain.len());
        for link in &chain {
            println!("  {} -[{}]-> {}", link.source, link.relationship, link.target);
        }
    }
    Ok(())
}

/// Persist a new edge, e.g. a connection discovered by a walk.
pub async fn cmd_link(
    engine: &AnalyticsEngine,
    source_id: &str,
    target_id: &str,
    relationship: RelationshipType,
    json: bool,
) -> AnalyticsResult<()> {
    let mut properties = EdgeProperties::new();
    properties.insert(
        "created_at".into(),
        serde_json::Value::from(crate::types::now_micros()),
    );
    engine
        .store()
        .create_edge(source_id, target_id, relationship, properties)
        .await?;
    engine.cache().invalidate();

    if json {
        print_json(&serde_json::json!({
            "source_id": source_id,
            "target_id": target_id,
            "relationship_type": relationship.name(),
        }))?;
    } else {
        println!("Linked {} -[{}]-> {}", source_id, relationship, target_id);
    }
    Ok(())
}

/// Print the default configuration as TOML.
pub fn cmd_default_config() -> AnalyticsResult<()> {
    print!("{}", AnalyticsConfig::default().to_toml()?);
    Ok(())
}

/// Create an empty graph file.
pub async fn cmd_init(path: &Path) -> AnalyticsResult<()> {
    if path.exists() {
        return Err(AnalyticsError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("{} already exists", path.display()),
        )));
    }
    JsonFileStore::create(path, &GraphDocument::default()).await?;
    println!("Created {}", path.display());
    Ok(())
}
