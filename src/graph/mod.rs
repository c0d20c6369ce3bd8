//! Snapshot view of the external graph: builder, cache and traversal.

pub mod builder;
pub mod cache;
pub mod snapshot;
pub mod traversal;

pub use builder::SnapshotBuilder;
pub use cache::{SnapshotCache, DEFAULT_TTL};
pub use snapshot::{Adjacency, Snapshot, TypedAdjacency};
pub use traversal::{trace_causal_chain, CausalLink, TraversalDirection};
