use crate::graph::components::Components;
use crate::graph::{RoadGraph, VertexId};

use petgraph::Direction;
use rustc_hash::FxHashMap;

/// One suspended call of the depth-first search.
struct Frame {
    vertex: VertexId,
    successors: Vec<VertexId>,
    cursor: usize,
}

#[derive(Default)]
struct Tarjan {
    counter: usize,
    index: FxHashMap<VertexId, usize>,
    low_link: FxHashMap<VertexId, usize>,
    stack: Vec<VertexId>,
    on_stack: FxHashMap<VertexId, bool>,
    components: Vec<Vec<VertexId>>,
}

impl Tarjan {
    fn open(&mut self, graph: &RoadGraph, vertex: VertexId) -> Frame {
        self.index.insert(vertex, self.counter);
        self.low_link.insert(vertex, self.counter);
        self.counter += 1;

        self.stack.push(vertex);
        self.on_stack.insert(vertex, true);

        Frame {
            vertex,
            successors: graph
                .neighbors_directed(vertex, Direction::Outgoing)
                .collect(),
            cursor: 0,
        }
    }

    fn low(&self, vertex: VertexId) -> usize {
        self.low_link.get(&vertex).copied().unwrap_or(usize::MAX)
    }

    fn lower(&mut self, vertex: VertexId, value: usize) {
        if value < self.low(vertex) {
            self.low_link.insert(vertex, value);
        }
    }

    /// Pops the component rooted at `root` off the stack.
    fn close(&mut self, root: VertexId) {
        let mut component = vec![];

        while let Some(vertex) = self.stack.pop() {
            self.on_stack.insert(vertex, false);
            component.push(vertex);

            if vertex == root {
                break;
            }
        }

        self.components.push(component);
    }

    fn visit(&mut self, graph: &RoadGraph, start: VertexId) {
        let mut frames = vec![self.open(graph, start)];

        while let Some(frame) = frames.last_mut() {
            let vertex = frame.vertex;

            if let Some(&next) = frame.successors.get(frame.cursor) {
                frame.cursor += 1;

                match self.index.get(&next).copied() {
                    None => {
                        let child = self.open(graph, next);
                        frames.push(child);
                    }
                    Some(index) if self.on_stack.get(&next).copied().unwrap_or(false) => {
                        self.lower(vertex, index);
                    }
                    Some(_) => {}
                }

                continue;
            }

            // Every successor is explored, return to the caller
            frames.pop();

            if let Some(parent) = frames.last() {
                let low = self.low(vertex);
                self.lower(parent.vertex, low);
            }

            if self.index.get(&vertex).copied() == Some(self.low(vertex)) {
                self.close(vertex);
            }
        }
    }
}

/// Labels the strongly connected components of `graph` with Tarjan's
/// algorithm, using an explicit stack of frames so that deep graphs
/// cannot exhaust the call stack.
///
/// Component ids follow the order in which Tarjan completes them,
/// which is a reverse topological order of the condensation.
pub fn strong_components(graph: &RoadGraph, small_component_size: usize) -> Components {
    let mut tarjan = Tarjan::default();

    for vertex in graph.nodes() {
        if !tarjan.index.contains_key(&vertex) {
            tarjan.visit(graph, vertex);
        }
    }

    Components::from_groups(tarjan.components, small_component_size)
}
