//! In-memory graph store with switchable availability and artificial latency.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{
    BeliefRecord, EdgeRecord, NodeRecord, RelationshipType, StoreError, StoreResult,
};

use super::{EdgeProperties, GraphDocument, GraphStore};

/// A store holding its graph in process memory.
pub struct InMemoryStore {
    document: RwLock<GraphDocument>,
    available: AtomicBool,
    latency_ms: AtomicUsize,
    fetch_count: AtomicUsize,
}

impl InMemoryStore {
    /// Create a store serving the given document.
    pub fn new(document: GraphDocument) -> Self {
        Self {
            document: RwLock::new(document),
            available: AtomicBool::new(true),
            latency_ms: AtomicUsize::new(0),
            fetch_count: AtomicUsize::new(0),
        }
    }

    /// Replace the whole document.
    pub fn replace(&self, document: GraphDocument) {
        *self.document.write().unwrap_or_else(|e| e.into_inner()) = document;
    }

    /// Apply a mutation to the document.
    pub fn update(&self, f: impl FnOnce(&mut GraphDocument)) {
        let mut guard = self.document.write().unwrap_or_else(|e| e.into_inner());
        f(&mut guard);
    }

    /// A copy of the current document.
    pub fn document(&self) -> GraphDocument {
        self.document
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Make every fetch fail with [`StoreError::Unavailable`] (or succeed again).
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Delay every fetch by the given duration.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as usize, Ordering::SeqCst);
    }

    /// Number of fetch calls served or attempted.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    async fn begin_fetch(&self) -> StoreResult<()> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency as u64)).await;
        }
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".into()));
        }
        Ok(())
    }

    fn read<T>(&self, f: impl FnOnce(&GraphDocument) -> T) -> T {
        let guard = self.document.read().unwrap_or_else(|e| e.into_inner());
        f(&guard)
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new(GraphDocument::new())
    }
}

#[async_trait]
impl GraphStore for InMemoryStore {
    async fn fetch_nodes(&self) -> StoreResult<Vec<NodeRecord>> {
        self.begin_fetch().await?;
        Ok(self.read(GraphDocument::node_records))
    }

    async fn fetch_edges(&self) -> StoreResult<Vec<EdgeRecord>> {
        self.begin_fetch().await?;
        Ok(self.read(GraphDocument::edge_records))
    }

    async fn fetch_beliefs(&self, min_confidence: Option<f64>) -> StoreResult<Vec<BeliefRecord>> {
        self.begin_fetch().await?;
        Ok(self.read(|doc| doc.beliefs(min_confidence)))
    }

    async fn create_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: RelationshipType,
        properties: EdgeProperties,
    ) -> StoreResult<()> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".into()));
        }
        let mut guard = self.document.write().unwrap_or_else(|e| e.into_inner());
        guard.insert_edge(source_id, target_id, relationship, properties)
    }
}
