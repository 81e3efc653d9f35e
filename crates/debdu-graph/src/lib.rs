//! Dependency graph and size aggregation for debdu.
//!
//! # Pipeline
//!
//! ```text
//! Catalog (debdu-core)
//!        ↓  alias::AliasIndex::from_catalog()
//! AliasIndex (alternative name → providing packages)
//!        ↓  build::SizeGraph::from_catalog()
//! SizeGraph (immutable DiGraph, resolved edges, unresolved diagnostics)
//!        ↓  sizes::transitive_sizes()
//! Vec<SizeEntry> (own + transitive footprint per package)
//! ```
//!
//! The graph is built in two passes (all nodes, then all edges) and is
//! read-only by the time any size is computed.

pub mod alias;
pub mod build;
pub mod sizes;

pub use alias::AliasIndex;
pub use build::{PackageNode, SizeGraph, Unresolved};
pub use sizes::{SizeEntry, transitive_sizes};
