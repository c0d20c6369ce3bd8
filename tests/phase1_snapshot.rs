//! Phase 1 tests: records, snapshot construction, cache and stores.

use std::sync::Arc;
use std::time::Duration;

use agentic_graph::graph::{SnapshotBuilder, SnapshotCache};
use agentic_graph::store::{EdgeProperties, GraphDocument, GraphStore, InMemoryStore, JsonFileStore};
use agentic_graph::types::{
    AnalyticsError, EdgeRecord, NodeRecord, NodeType, RelationshipType, StoreError,
};

// ==================== Helper ====================

/// A small mixed graph: two beliefs, a memory, an emotion and a concept.
fn sample_document() -> GraphDocument {
    let mut doc = GraphDocument::new();
    doc.push_belief("b1", "the build is stable", 0.9)
        .push_belief("b2", "the build is not stable", 0.8)
        .push_node(NodeRecord::new("m1", "memory").access_count(4))
        .push_node(NodeRecord::new("e1", "emotion").intensity(0.9))
        .push_node(NodeRecord::new("c1", "concept"))
        .push_edge("b1", "b2", RelationshipType::Contradicts)
        .push_edge("m1", "b1", RelationshipType::Supports)
        .push_edge("m1", "e1", RelationshipType::Caused)
        .push_edge("e1", "c1", RelationshipType::AssociatedWith);
    doc
}

// ==================== Record Tests ====================

#[test]
fn test_node_weight_formula() {
    let full = NodeRecord::new("n", "belief")
        .confidence(1.0)
        .intensity(1.0)
        .access_count(25);
    assert!((full.weight() - 1.0).abs() < 1e-12);

    let defaults = NodeRecord::new("n", "concept");
    assert!((defaults.weight() - 0.3).abs() < 1e-12);

    let partial = NodeRecord::new("n", "memory").confidence(0.2).access_count(5);
    let expected = 0.3 * 0.2 + 0.3 * 0.5 + 0.4 * 0.5;
    assert!((partial.weight() - expected).abs() < 1e-12);
}

#[test]
fn test_label_dispatch() {
    assert_eq!(NodeType::from_name("belief"), Some(NodeType::Belief));
    assert_eq!(NodeType::from_name("nonsense"), None);
    assert_eq!(
        RelationshipType::from_name("caused"),
        Some(RelationshipType::Caused)
    );
    assert!(RelationshipType::Prevented.is_causal());
    assert!(!RelationshipType::Supports.is_causal());
}

// ==================== Snapshot Tests ====================

#[test]
fn test_snapshot_views() {
    let doc = sample_document();
    let snapshot = SnapshotBuilder::from_records(&doc.node_records(), &doc.edge_records()).build();

    assert_eq!(snapshot.node_count(), 5);
    assert_eq!(snapshot.edge_count(), 4);

    // Symmetric view has both directions.
    assert!(snapshot.neighbors("b2").contains(&"b1".to_string()));
    assert!(snapshot.neighbors("b1").contains(&"b2".to_string()));

    // Typed view keeps direction.
    let typed = snapshot.typed_adjacency();
    assert_eq!(
        typed["m1"],
        vec![
            ("b1".to_string(), RelationshipType::Supports),
            ("e1".to_string(), RelationshipType::Caused),
        ]
    );
    assert!(typed["c1"].is_empty());

    assert_eq!(snapshot.node_type("e1"), Some(NodeType::Emotion));
    assert_eq!(snapshot.nodes_of_type(NodeType::Belief), vec!["b1", "b2"]);
    assert!((snapshot.weight("b1").unwrap() - (0.27 + 0.15)).abs() < 1e-12);
}

#[test]
fn test_snapshot_skips_bad_records() {
    let nodes = vec![
        NodeRecord::new("a", "belief"),
        NodeRecord::new("b", "mystery"),
        NodeRecord::new("a", "concept"),
        NodeRecord::new("c", "goal"),
    ];
    let edges = vec![
        EdgeRecord::new("a", "c", "ENABLED"),
        EdgeRecord::new("a", "b", "CAUSED"),
        EdgeRecord::new("a", "c", "TELEPORTS_TO"),
    ];
    let builder = SnapshotBuilder::from_records(&nodes, &edges);
    assert_eq!(builder.skipped(), (2, 2));
    let snapshot = builder.build();
    assert_eq!(snapshot.node_count(), 2);
    assert_eq!(snapshot.edge_count(), 1);
    assert_eq!(snapshot.node_type("a"), Some(NodeType::Belief));
}

#[test]
fn test_empty_snapshot() {
    let snapshot = SnapshotBuilder::new().build();
    assert!(snapshot.is_empty());
    assert_eq!(snapshot.edge_count(), 0);
    assert!(snapshot.adjacency().is_empty());
}

// ==================== Cache Tests ====================

#[tokio::test]
async fn test_cache_extract_and_ttl() {
    let store = InMemoryStore::new(sample_document());
    let cache = SnapshotCache::new(Duration::from_secs(60));
    assert!(cache.is_stale());
    assert!(cache.current().is_none());

    let snapshot = cache.extract(&store).await.unwrap();
    assert_eq!(snapshot.node_count(), 5);
    assert_eq!(snapshot.beliefs().len(), 2);
    assert_eq!(snapshot.beliefs()[0].content, "the build is stable");
    assert!(!cache.is_stale());
    assert!(cache.is_stale_at(snapshot.extracted_at() + Duration::from_secs(61)));
    assert!(!cache.is_stale_at(snapshot.extracted_at() + Duration::from_secs(60)));

    cache.invalidate();
    assert!(cache.is_stale());
}

#[tokio::test]
async fn test_cache_failure_keeps_previous() {
    let store = InMemoryStore::new(sample_document());
    let cache = SnapshotCache::default();
    let first = cache.extract(&store).await.unwrap();

    store.set_available(false);
    let err = cache.extract(&store).await.unwrap_err();
    assert!(err.is_extraction_failure());
    assert!(Arc::ptr_eq(err.stale_snapshot().unwrap(), &first));
    assert!(Arc::ptr_eq(&cache.current().unwrap(), &first));
}

#[tokio::test]
async fn test_cache_failure_without_snapshot() {
    let store = InMemoryStore::new(sample_document());
    store.set_available(false);
    let cache = SnapshotCache::default();
    match cache.extract(&store).await {
        Err(AnalyticsError::ExtractionFailed {
            source: StoreError::Unavailable(_),
            stale: None,
        }) => {}
        other => panic!("unexpected result: {:?}", other.map(|s| s.node_count())),
    }
}

// ==================== Store Tests ====================

#[tokio::test]
async fn test_json_store_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("graph.json");
    let store = JsonFileStore::create(&path, &sample_document()).await.unwrap();

    assert_eq!(store.fetch_nodes().await.unwrap().len(), 5);
    assert_eq!(store.fetch_edges().await.unwrap().len(), 4);

    store
        .create_edge("c1", "b2", RelationshipType::DerivedFrom, EdgeProperties::new())
        .await
        .unwrap();
    let reopened = JsonFileStore::open(&path);
    assert_eq!(reopened.fetch_edges().await.unwrap().len(), 5);

    let err = reopened
        .create_edge("c1", "ghost", RelationshipType::Caused, EdgeProperties::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Query(_)));
}

#[tokio::test]
async fn test_json_store_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("absent.json"));
    assert!(matches!(
        store.fetch_nodes().await,
        Err(StoreError::Io(_))
    ));
}
