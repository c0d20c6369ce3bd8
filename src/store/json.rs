//! Graph store backed by a JSON document on disk.
//!
//! The file is re-read on every fetch, so edits made by other processes show up
//! at the next snapshot refresh.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::types::{BeliefRecord, EdgeRecord, NodeRecord, RelationshipType, StoreResult};

use super::{EdgeProperties, GraphDocument, GraphStore};

/// A store reading and writing a single JSON graph document.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store over an existing file.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Write a fresh document to `path` and open a store over it.
    pub async fn create(path: impl Into<PathBuf>, document: &GraphDocument) -> StoreResult<Self> {
        let store = Self::open(path);
        store.write_document(document).await?;
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and parse the backing file.
    pub async fn read_document(&self) -> StoreResult<GraphDocument> {
        let raw = tokio::fs::read_to_string(&self.path).await?;
        let document: GraphDocument = serde_json::from_str(&raw)?;
        log::debug!(
            "Read {} nodes and {} edges from {}",
            document.nodes.len(),
            document.edges.len(),
            self.path.display()
        );
        Ok(document)
    }

    async fn write_document(&self, document: &GraphDocument) -> StoreResult<()> {
        let raw = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }
}

#[async_trait]
impl GraphStore for JsonFileStore {
    async fn fetch_nodes(&self) -> StoreResult<Vec<NodeRecord>> {
        Ok(self.read_document().await?.node_records())
    }

    async fn fetch_edges(&self) -> StoreResult<Vec<EdgeRecord>> {
        Ok(self.read_document().await?.edge_records())
    }

    async fn fetch_beliefs(&self, min_confidence: Option<f64>) -> StoreResult<Vec<BeliefRecord>> {
        Ok(self.read_document().await?.beliefs(min_confidence))
    }

    async fn create_edge(
        &self,
        source_id: &str,
        target_id: &str,
        relationship: RelationshipType,
        properties: EdgeProperties,
    ) -> StoreResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut document = self.read_document().await?;
        document.insert_edge(source_id, target_id, relationship, properties)?;
        self.write_document(&document).await?;
        log::info!(
            "Persisted edge {} -[{}]-> {} to {}",
            source_id,
            relationship,
            target_id,
            self.path.display()
        );
        Ok(())
    }
}
