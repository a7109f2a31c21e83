use crate::graph::components::Components;
use crate::graph::{RoadGraph, VertexId};

use petgraph::Direction;
use rustc_hash::FxHashSet;
use std::collections::VecDeque;

/// Labels the weakly connected components of `graph`.
///
/// Arcs are followed in both directions. Vertices are visited in
/// insertion order, so component ids are stable for a given input.
pub fn weak_components(graph: &RoadGraph, small_component_size: usize) -> Components {
    let mut visited: FxHashSet<VertexId> = FxHashSet::default();
    let mut groups = vec![];

    for start in graph.nodes() {
        if !visited.insert(start) {
            continue;
        }

        let mut group = vec![];
        let mut queue = VecDeque::from([start]);

        while let Some(vertex) = queue.pop_front() {
            group.push(vertex);

            let neighbours = graph
                .neighbors_directed(vertex, Direction::Outgoing)
                .chain(graph.neighbors_directed(vertex, Direction::Incoming));

            for neighbour in neighbours {
                if visited.insert(neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }

        groups.push(group);
    }

    Components::from_groups(groups, small_component_size)
}
