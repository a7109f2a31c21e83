//! Shortest path oracle over the road graph.
//!
//! The matcher and the ancillary queries only ever route through the
//! [`RouteOracle`] capability, the default implementation of which is
//! the [`GraphRouter`], borrowing the graph of a [`MapEngine`](crate::graph::MapEngine).
//!
//! Unreachable targets are reported as `None`.

use crate::graph::{VertexId, Weight};

use rustc_hash::FxHashMap;

#[doc(hidden)]
pub mod dijkstra;
#[doc(hidden)]
pub mod router;


#[doc(inline)]
pub use dijkstra::{Dijkstra, ReachedVertex};
#[doc(inline)]
pub use router::GraphRouter;

/// A routed path, its total cost and the vertices it passes through.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub cost: Weight,
    pub vertices: Vec<VertexId>,
}

/// Directed, weighted shortest path queries.
pub trait RouteOracle {
    /// The cheapest path from `source` to `target`.
    fn shortest_path(&self, source: VertexId, target: VertexId) -> Option<Path>;

    /// The cheapest path from `source` to every target, in the order given.
    fn shortest_path_one_to_many(&self, source: VertexId, targets: &[VertexId]) -> Vec<Option<Path>>;

    /// Every vertex reachable from `source` at a cost of at most `max_cost`.
    fn isochrones(&self, source: VertexId, max_cost: Weight) -> FxHashMap<VertexId, Weight>;
}
