use crate::fixtures::four_networks;
use crate::graph::components::{strong_components, weak_components};
use crate::graph::{RoadGraph, VertexId};

use petgraph::algo::tarjan_scc;
use rustc_hash::FxHashSet;

fn path_graph(length: VertexId) -> RoadGraph {
    let mut graph = RoadGraph::default();
    for vertex in 0..length {
        graph.add_edge(vertex, vertex + 1, Default::default());
    }

    graph
}

#[test]
fn weak_labels() {
    let engine = four_networks();
    let weak = engine.weak_components();

    assert_eq!(weak.total_components(), 4);
    assert_eq!(weak.component_sizes(), &[4, 4, 4, 4]);
    assert_eq!(weak.big_component_id(), Some(0));
    assert_eq!(weak.len(), 16);

    for network in 0..4 {
        let first = network * 4;
        for vertex in first..first + 4 {
            assert_eq!(weak.component(vertex), Some(network as usize));
        }
    }

    assert!(weak.same_component(8, 11));
    assert!(!weak.same_component(3, 4));
    assert!(!weak.same_component(3, 99));
    assert!(weak.in_big_component(2));
    assert!(!weak.in_big_component(12));
}

#[test]
fn strong_labels() {
    let engine = four_networks();
    let strong = engine.strong_components();

    // Vertex 8 only has outgoing edges, so it stands alone
    assert_eq!(strong.total_components(), 5);
    assert_eq!(strong.component_sizes().iter().sum::<usize>(), 16);
    assert_eq!(strong.big_component_id(), Some(0));

    let alone = strong.component(8).expect("8 is labelled");
    assert_eq!(strong.size(alone), Some(1));
    assert!(strong.same_component(9, 11));
    assert!(!strong.same_component(8, 9));

    // Every component is below the default threshold
    assert!((0..strong.total_components()).all(|id| strong.is_tiny(id)));
}

#[test]
fn strong_labels_agree_with_petgraph() {
    let engine = four_networks();
    let strong = engine.strong_components();

    let expected = tarjan_scc(engine.graph());
    assert_eq!(expected.len(), strong.total_components());

    for group in expected {
        let labels = group
            .iter()
            .filter_map(|vertex| strong.component(*vertex))
            .collect::<FxHashSet<_>>();

        assert_eq!(labels.len(), 1, "{group:?} must share a single label");
    }
}

#[test]
fn deep_graphs_do_not_overflow() {
    let graph = path_graph(200_000);

    let strong = strong_components(&graph, 1000);
    assert_eq!(strong.total_components(), 200_001);
    assert!(strong.is_tiny(0));

    let weak = weak_components(&graph, 1000);
    assert_eq!(weak.total_components(), 1);
    assert_eq!(weak.size(0), Some(200_001));
    assert!(!weak.is_tiny(0));
}

#[test]
fn cycle_is_one_component() {
    let mut graph = path_graph(5_000);
    graph.add_edge(5_000, 0, Default::default());

    let strong = strong_components(&graph, 1000);
    assert_eq!(strong.total_components(), 1);
    assert_eq!(strong.big_component_id(), Some(0));
    assert!(!strong.is_tiny(0));
}

#[test]
fn empty_graph() {
    let graph = RoadGraph::default();
    let strong = strong_components(&graph, 1000);

    assert!(strong.is_empty());
    assert_eq!(strong.big_component_id(), None);
}
