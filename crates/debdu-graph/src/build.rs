//! Dependency graph construction from the package catalog.
//!
//! # Overview
//!
//! Builds a [`petgraph`] directed graph over the catalog: one node per
//! installed package, one edge `A → B` meaning "A depends on B". Nodes
//! are created first, edges resolved in a second pass, and the structure
//! is read-only afterwards — traversal never observes a half-built graph.
//!
//! ## Dependency Resolution
//!
//! Each name in a record's `depends` set resolves in this order:
//!
//! 1. Exact match against the node catalog.
//! 2. Fallback through the [`AliasIndex`]: the first provider (arbitrary
//!    order, stable within a run) that has a node wins.
//! 3. Otherwise the dependency is unresolved: a diagnostic is recorded
//!    and logged, the edge is dropped, and the build continues.
//!
//! ## Self-Reference
//!
//! A dependency resolving back to the declaring package (possible when a
//! package provides a name it also depends on) is skipped, so the graph
//! carries no literal self-loops. Traversal stays cycle-safe regardless;
//! mutual dependencies between distinct packages remain in the data.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use debdu_core::Catalog;
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::{instrument, warn};

use crate::alias::AliasIndex;

// ---------------------------------------------------------------------------
// Node and diagnostic types
// ---------------------------------------------------------------------------

/// Graph weight: one installed package and its own footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageNode {
    /// Package name, unique across the graph.
    pub name: String,
    /// On-disk footprint of this package alone (KiB).
    pub own_size: u64,
}

/// A dependency that resolved to no node, even via the alias index.
///
/// Unresolved dependencies are warnings, never failures: the edge is
/// omitted and the dependent package still appears in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    /// Package that declared the dependency.
    pub dependent: String,
    /// The name that could not be resolved.
    pub dependency: String,
}

// ---------------------------------------------------------------------------
// SizeGraph
// ---------------------------------------------------------------------------

/// The resolved dependency graph for one catalog, immutable after build.
///
/// Nodes carry [`PackageNode`] weights and are addressed through
/// `node_map` rather than shared mutable links, so downstream traversal
/// works over stable indices.
#[derive(Debug)]
pub struct SizeGraph {
    /// Directed graph: edge `A → B` means "A depends on B".
    pub graph: DiGraph<PackageNode, ()>,
    /// Mapping from package name to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
    /// Dependencies that could not be resolved to any node.
    pub unresolved: Vec<Unresolved>,
}

impl SizeGraph {
    /// Build the graph from a catalog and its alias index.
    ///
    /// All nodes are created before any edge is resolved, so alias
    /// fallback always sees the complete node set.
    #[instrument(skip(catalog, aliases), fields(packages = catalog.len()))]
    #[must_use]
    pub fn from_catalog(catalog: &Catalog, aliases: &AliasIndex) -> Self {
        let mut graph = DiGraph::<PackageNode, ()>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::with_capacity(catalog.len());

        // Pass 1: one node per record.
        for record in catalog.values() {
            let idx = graph.add_node(PackageNode {
                name: record.name.clone(),
                own_size: record.installed_size,
            });
            node_map.insert(record.name.clone(), idx);
        }

        // Pass 2: resolve edges.
        let mut unresolved = Vec::new();
        for record in catalog.values() {
            let from = node_map[&record.name];
            for dependency in &record.depends {
                match resolve(dependency, &node_map, aliases) {
                    Some(to) if to == from => {
                        // No literal self-loops; a package trivially
                        // contains itself in its own transitive set.
                    }
                    Some(to) => {
                        // Two depends entries can resolve to the same
                        // provider; keep one edge.
                        if !graph.contains_edge(from, to) {
                            graph.add_edge(from, to, ());
                        }
                    }
                    None => {
                        warn!(
                            dependent = %record.name,
                            dependency = %dependency,
                            "cannot resolve dependency; edge dropped"
                        );
                        unresolved.push(Unresolved {
                            dependent: record.name.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                }
            }
        }

        Self {
            graph,
            node_map,
            unresolved,
        }
    }

    /// Number of packages in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of resolved dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a package name.
    #[must_use]
    pub fn node_index(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    /// The node weight at `idx`.
    #[must_use]
    pub fn package(&self, idx: NodeIndex) -> Option<&PackageNode> {
        self.graph.node_weight(idx)
    }
}

/// Resolve a dependency name to a node: exact match first, then the
/// first alias provider (arbitrary order) that has a node.
fn resolve(
    name: &str,
    node_map: &HashMap<String, NodeIndex>,
    aliases: &AliasIndex,
) -> Option<NodeIndex> {
    if let Some(idx) = node_map.get(name) {
        return Some(*idx);
    }
    aliases
        .providers_of(name)?
        .iter()
        .find_map(|provider| node_map.get(provider).copied())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
