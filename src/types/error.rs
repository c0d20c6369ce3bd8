//! Error types for the analytics engine and its store collaborator.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::graph::Snapshot;

/// Errors raised by a [`GraphStore`](crate::store::GraphStore) implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be reached.
    #[error("Graph store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed a query.
    #[error("Graph store query failed: {0}")]
    Query(String),

    /// IO error while reading or writing a file-backed store.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed store document.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// All errors that can occur in the analytics engine.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Snapshot extraction failed. The previous snapshot, if any, is still current
    /// and is handed back so the caller can fall back to it.
    #[error("Snapshot extraction failed ({}): {source}", stale_note(.stale))]
    ExtractionFailed {
        #[source]
        source: StoreError,
        stale: Option<Arc<Snapshot>>,
    },

    /// Snapshot extraction did not finish within the allotted time.
    #[error("Snapshot extraction timed out after {timeout:?} ({})", stale_note(.stale))]
    ExtractionTimeout {
        timeout: Duration,
        stale: Option<Arc<Snapshot>>,
    },

    /// A store write failed.
    #[error("Store write failed: {0}")]
    Store(#[from] StoreError),

    /// A parameter is outside its valid domain.
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Node not present in the snapshot.
    #[error("Node {0} not found")]
    NodeNotFound(String),

    /// A blocking worker task failed to complete.
    #[error("Worker task failed: {0}")]
    Worker(String),

    /// Configuration could not be loaded or is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn stale_note(stale: &Option<Arc<Snapshot>>) -> &'static str {
    if stale.is_some() {
        "serving stale snapshot"
    } else {
        "no snapshot available"
    }
}

impl AnalyticsError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// The last good snapshot carried by an extraction failure, if one exists.
    pub fn stale_snapshot(&self) -> Option<&Arc<Snapshot>> {
        match self {
            Self::ExtractionFailed { stale, .. } | Self::ExtractionTimeout { stale, .. } => {
                stale.as_ref()
            }
            _ => None,
        }
    }

    /// True for refresh failures (fetch error or timeout).
    pub fn is_extraction_failure(&self) -> bool {
        matches!(
            self,
            Self::ExtractionFailed { .. } | Self::ExtractionTimeout { .. }
        )
    }
}

/// Convenience result type for analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
