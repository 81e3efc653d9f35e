//! Transitive size aggregation over the resolved dependency graph.
//!
//! For every package, the transitive size is the sum of `own_size` over
//! the package itself plus everything reachable along dependency edges,
//! each reachable package counted exactly once no matter how many paths
//! lead to it. The walk is petgraph's [`Bfs`], whose visited set both
//! deduplicates diamond-shaped dependencies and guarantees termination
//! on cycles (mutual or self-referential).
//!
//! Each package's walk runs independently over the immutable graph
//! snapshot; the graphs involved are small enough that memoizing shared
//! subtrees is not worth the bookkeeping.

use petgraph::visit::Bfs;
use serde::Serialize;

use crate::build::SizeGraph;

/// One package's size accounting, the unit of the final report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SizeEntry {
    /// Package name.
    pub name: String,
    /// Footprint of the package alone (KiB).
    pub own_size: u64,
    /// Footprint of the package plus all transitive dependencies (KiB),
    /// each dependency counted once.
    pub transitive_size: u64,
}

/// Compute every package's transitive size.
///
/// Entries come back in the graph's node order; callers sort for
/// presentation. Must only be called once the graph is fully built —
/// [`SizeGraph::from_catalog`] returns it finalized.
#[must_use]
pub fn transitive_sizes(size_graph: &SizeGraph) -> Vec<SizeEntry> {
    let graph = &size_graph.graph;
    let mut entries = Vec::with_capacity(graph.node_count());

    for start in graph.node_indices() {
        let mut total: u64 = 0;
        let mut bfs = Bfs::new(graph, start);
        while let Some(idx) = bfs.next(graph) {
            total += graph[idx].own_size;
        }

        let node = &graph[start];
        entries.push(SizeEntry {
            name: node.name.clone(),
            own_size: node.own_size,
            transitive_size: total,
        });
    }

    entries
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
