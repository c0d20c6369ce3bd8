//! TTL-tracked holder of the current snapshot.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::store::GraphStore;
use crate::types::{AnalyticsError, AnalyticsResult};

use super::{Snapshot, SnapshotBuilder};

/// Default time a snapshot stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Owns the current snapshot reference. Readers clone the `Arc` and keep
/// working on it while a refresh swaps in a replacement.
pub struct SnapshotCache {
    ttl: Duration,
    current: RwLock<Option<Arc<Snapshot>>>,
}

impl SnapshotCache {
    /// Create an empty cache.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: RwLock::new(None),
        }
    }

    /// Freshness window.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// The current snapshot, stale or not.
    pub fn current(&self) -> Option<Arc<Snapshot>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// True if nothing was ever extracted or the last extraction is older than the TTL.
    pub fn is_stale(&self) -> bool {
        self.is_stale_at(Instant::now())
    }

    /// Staleness as observed at `now`.
    pub fn is_stale_at(&self, now: Instant) -> bool {
        match self.current() {
            Some(snapshot) => now.saturating_duration_since(snapshot.extracted_at()) > self.ttl,
            None => true,
        }
    }

    /// Drop the current snapshot; the next access re-extracts.
    pub fn invalidate(&self) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    /// Swap in a finished snapshot and return the shared handle to it.
    pub fn install(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Fetch nodes, edges and belief content, build a complete snapshot, then
    /// swap it in. On failure the previous snapshot stays current and is
    /// returned inside the error.
    pub async fn extract(&self, store: &dyn GraphStore) -> AnalyticsResult<Arc<Snapshot>> {
        let started = Instant::now();
        let fetched = tokio::try_join!(
            store.fetch_nodes(),
            store.fetch_edges(),
            store.fetch_beliefs(None)
        );
        let (nodes, edges, beliefs) = match fetched {
            Ok(rows) => rows,
            Err(source) => {
                let stale = self.current();
                log::warn!(
                    "Snapshot extraction failed: {} (keeping {} snapshot)",
                    source,
                    if stale.is_some() { "previous" } else { "no" }
                );
                return Err(AnalyticsError::ExtractionFailed { source, stale });
            }
        };

        let builder = SnapshotBuilder::from_records(&nodes, &edges).with_beliefs(&beliefs);
        let (skipped_nodes, skipped_edges) = builder.skipped();
        let clamped = builder.clamped();
        let snapshot = self.install(builder.build());
        log::info!(
            "Extracted snapshot: {} nodes, {} edges, {} beliefs ({} nodes and {} edges skipped, {} clamped) in {:?}",
            snapshot.node_count(),
            snapshot.edge_count(),
            snapshot.beliefs().len(),
            skipped_nodes,
            skipped_edges,
            clamped,
            started.elapsed()
        );
        Ok(snapshot)
    }

    /// [`extract`](Self::extract) bounded by an optional timeout. A timed-out
    /// extraction is dropped before anything is swapped in.
    pub async fn extract_with_timeout(
        &self,
        store: &dyn GraphStore,
        timeout: Option<Duration>,
    ) -> AnalyticsResult<Arc<Snapshot>> {
        let Some(timeout) = timeout else {
            return self.extract(store).await;
        };
        match tokio::time::timeout(timeout, self.extract(store)).await {
            Ok(result) => result,
            Err(_) => {
                log::warn!("Snapshot extraction timed out after {:?}", timeout);
                Err(AnalyticsError::ExtractionTimeout {
                    timeout,
                    stale: self.current(),
                })
            }
        }
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{GraphDocument, InMemoryStore};
    use crate::types::{NodeRecord, RelationshipType};

    fn store() -> InMemoryStore {
        let mut doc = GraphDocument::new();
        doc.push_node(NodeRecord::new("a", "concept"))
            .push_node(NodeRecord::new("b", "concept"))
            .push_edge("a", "b", RelationshipType::RelatesTo);
        InMemoryStore::new(doc)
    }

    #[tokio::test]
    async fn empty_cache_is_stale() {
        let cache = SnapshotCache::default();
        assert!(cache.is_stale());
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn extraction_is_fresh_until_ttl_elapses() {
        let cache = SnapshotCache::new(Duration::from_secs(60));
        let snap = cache.extract(&store()).await.unwrap();
        assert_eq!(snap.node_count(), 2);
        assert!(!cache.is_stale());
        assert!(!cache.is_stale_at(snap.extracted_at() + Duration::from_secs(60)));
        assert!(cache.is_stale_at(snap.extracted_at() + Duration::from_secs(61)));
    }

    #[tokio::test]
    async fn failed_extraction_keeps_previous_snapshot() {
        let cache = SnapshotCache::default();
        let store = store();
        let first = cache.extract(&store).await.unwrap();

        store.set_available(false);
        let err = cache.extract(&store).await.unwrap_err();
        assert!(err.is_extraction_failure());
        let stale = err.stale_snapshot().expect("previous snapshot handed back");
        assert!(Arc::ptr_eq(stale, &first));
        assert!(Arc::ptr_eq(&cache.current().unwrap(), &first));
    }

    #[tokio::test]
    async fn readers_keep_their_snapshot_across_refresh() {
        let cache = SnapshotCache::default();
        let store = store();
        let held = cache.extract(&store).await.unwrap();

        store.update(|doc| {
            doc.push_node(NodeRecord::new("c", "goal"));
        });
        let fresh = cache.extract(&store).await.unwrap();

        assert_eq!(held.node_count(), 2);
        assert_eq!(fresh.node_count(), 3);
        assert!(Arc::ptr_eq(&cache.current().unwrap(), &fresh));
    }

    #[tokio::test]
    async fn racing_refreshes_swap_whole_snapshots() {
        let cache = SnapshotCache::default();
        let slow = store();
        let held = cache.extract(&slow).await.unwrap();

        slow.update(|doc| {
            doc.push_node(NodeRecord::new("c", "goal"))
                .push_edge("b", "c", RelationshipType::Supports);
        });
        slow.set_latency(Duration::from_millis(80));
        let fast = store();
        fast.update(|doc| {
            doc.push_node(NodeRecord::new("d", "event"))
                .push_edge("a", "d", RelationshipType::Caused);
        });
        fast.set_latency(Duration::from_millis(10));

        let (late, early) = tokio::join!(cache.extract(&slow), cache.extract(&fast));
        let late = late.unwrap();
        let early = early.unwrap();

        assert_eq!(held.node_count(), 2);
        assert_eq!(held.edge_count(), 1);
        assert!(!held.contains("c") && !held.contains("d"));

        assert!(early.contains("d") && !early.contains("c"));
        assert!(late.contains("c") && !late.contains("d"));
        assert_eq!(late.edge_count(), 2);

        // The later swap wins and the cache holds exactly one of the two.
        let current = cache.current().unwrap();
        assert!(Arc::ptr_eq(&current, &late));
        assert_eq!(current.neighbors("c"), &["b".to_string()]);
        assert!(!current.neighbors("a").contains(&"d".to_string()));
    }

    #[tokio::test]
    async fn timeout_leaves_cache_untouched() {
        let cache = SnapshotCache::default();
        let store = store();
        store.set_latency(Duration::from_millis(200));
        let err = cache
            .extract_with_timeout(&store, Some(Duration::from_millis(10)))
            .await
            .unwrap_err();
        assert!(matches!(err, AnalyticsError::ExtractionTimeout { stale: None, .. }));
        assert!(cache.current().is_none());
    }

    #[tokio::test]
    async fn invalidate_forces_staleness() {
        let cache = SnapshotCache::default();
        cache.extract(&store()).await.unwrap();
        cache.invalidate();
        assert!(cache.is_stale());
    }
}
