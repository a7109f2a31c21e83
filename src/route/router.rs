use crate::graph::{RoadGraph, VertexId, Weight};
use crate::route::{Dijkstra, Path, RouteOracle};

use log::debug;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use rustc_hash::{FxHashMap, FxHashSet};

/// The default [`RouteOracle`], searching the engine graph directly.
///
/// Holds no scratch state between queries, so a single router
/// may be shared freely across threads.
#[derive(Clone, Copy, Debug)]
pub struct GraphRouter<'a> {
    graph: &'a RoadGraph,
}

impl<'a> GraphRouter<'a> {
    pub fn new(graph: &'a RoadGraph) -> Self {
        Self { graph }
    }

    fn successors(&self, vertex: VertexId) -> impl Iterator<Item = (VertexId, Weight)> + 'a {
        self.graph
            .edges_directed(vertex, Direction::Outgoing)
            .map(|(_, target, edge)| (target, edge.weight))
    }
}

impl RouteOracle for GraphRouter<'_> {
    fn shortest_path(&self, source: VertexId, target: VertexId) -> Option<Path> {
        debug!("Routing {source} -> {target}");

        if !self.graph.contains_node(source) || !self.graph.contains_node(target) {
            return None;
        }

        let (cost, vertices) = petgraph::algo::astar(
            self.graph,
            source,
            |finish| finish == target,
            |edge| edge.weight().weight,
            |_| 0.0,
        )?;

        Some(Path { cost, vertices })
    }

    /// Settles vertices outwards from `source` until every
    /// reachable target is found, answering all of them at once.
    fn shortest_path_one_to_many(&self, source: VertexId, targets: &[VertexId]) -> Vec<Option<Path>> {
        if !self.graph.contains_node(source) {
            return vec![None; targets.len()];
        }

        let mut remaining = targets
            .iter()
            .copied()
            .filter(|target| self.graph.contains_node(*target))
            .collect::<FxHashSet<_>>();

        let mut costs: FxHashMap<VertexId, Weight> = FxHashMap::default();
        let mut reach = Dijkstra.reach(source, |vertex| self.successors(vertex));

        while !remaining.is_empty() {
            let Some(reached) = reach.next() else {
                break;
            };

            if remaining.remove(&reached.vertex) {
                costs.insert(reached.vertex, reached.cost);
            }
        }

        targets
            .iter()
            .map(|target| {
                let cost = *costs.get(target)?;
                let vertices = reach.path_to(*target)?;
                Some(Path { cost, vertices })
            })
            .collect()
    }

    fn isochrones(&self, source: VertexId, max_cost: Weight) -> FxHashMap<VertexId, Weight> {
        if !self.graph.contains_node(source) {
            return FxHashMap::default();
        }

        Dijkstra
            .reach(source, |vertex| self.successors(vertex))
            .take_while(|reached| reached.cost <= max_cost)
            .map(|reached| (reached.vertex, reached.cost))
            .collect()
    }
}
