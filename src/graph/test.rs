use crate::config::EngineConfig;
use crate::fixtures::four_networks;
use crate::geo::{GeoPoint, Polyline, Srid};
use crate::graph::loader::read_edges;
use crate::graph::{Edge, EngineBuilder, GraphError, Vertex};
use crate::spatial::SpatialError;

use geo::wkt;

fn planar(line: geo::LineString<f64>) -> Polyline {
    Polyline::new(Srid::Planar, line).unwrap()
}

#[test_log::test]
fn loads_fixture() {
    let engine = four_networks();

    assert_eq!(engine.srid(), Srid::Planar);
    assert_eq!(engine.edge_count(), 24);
    assert_eq!(engine.vertex_count(), 16);

    let first = engine.edge_between(0, 1).expect("0 -> 1 exists");
    assert_eq!(first.id, 0);
    assert_eq!(first.weight, 1.4142135623730951);

    let last = engine.edge(23).expect("edge 23 exists");
    assert_eq!((last.source, last.target), (15, 12));
    assert_eq!(last.weight, 4.9);

    assert_eq!(
        engine.vertex(12).map(|vertex| vertex.point),
        Some(GeoPoint::planar(-1.0, -5.0).unwrap())
    );

    // Edges are directed
    assert!(engine.edge_between(1, 0).is_none());

    let edges = engine.path_edges(&[8, 9, 10, 11]).map(|edge| edge.id).collect::<Vec<_>>();
    assert_eq!(edges, vec![13, 14, 15]);
}

#[test_log::test]
fn bidirectional_rows() {
    let table = "source;target;oneway;weight;geom
1;2;B;5;LINESTRING(0 0, 3 4)
2;2;F;1;LINESTRING(3 4, 3 4)
2;3;F;2;LINESTRING(3 4, 5 4)
";

    let edges = read_edges(table.as_bytes(), Srid::Planar).unwrap();
    let summary = edges
        .iter()
        .map(|edge| (edge.id, edge.source, edge.target))
        .collect::<Vec<_>>();

    // The self-loop row is skipped, without consuming an id
    assert_eq!(summary, vec![(0, 1, 2), (1, 2, 1), (2, 2, 3)]);

    assert_eq!(edges[1].weight, 5.0);
    assert_eq!(edges[1].geometry.line(), &wkt! { LINESTRING(3. 4., 0. 0.) });
}

#[test]
fn malformed_rows() {
    let table = "source;target;oneway;weight;geom
1;2;F;5;LINESTRING(0 0, 3 4)
2;3;F;2;POINT(3 4)
";
    let result = read_edges(table.as_bytes(), Srid::Planar);
    assert!(matches!(result, Err(GraphError::InvalidRow(2, _))));

    let table = "source;target;oneway;weight;geom
1;2;F;heavy;LINESTRING(0 0, 3 4)
";
    let result = read_edges(table.as_bytes(), Srid::Planar);
    assert!(matches!(result, Err(GraphError::Csv(_))));

    let table = "source;target;oneway;weight;geom
1;2;F;5;LINESTRING(0 0, 300 4)
";
    let result = read_edges(table.as_bytes(), Srid::Wgs84);
    assert!(matches!(result, Err(GraphError::InvalidRow(1, _))));
}

#[test]
fn builder_validation() {
    let mut builder = EngineBuilder::new(EngineConfig::planar());
    let line = planar(wkt! { LINESTRING(0. 0., 1. 0.) });

    let looped = builder.add_edge(Edge::new(1, 4, 4, 1.0, line.clone()));
    assert!(matches!(looped, Err(GraphError::SelfLoop(1, 4))));

    let negative = builder.add_edge(Edge::new(1, 4, 5, -1.0, line.clone()));
    assert!(matches!(negative, Err(GraphError::InvalidWeight(1, _))));

    let geodetic = Polyline::new(Srid::Wgs84, wkt! { LINESTRING(0. 0., 1. 0.) }).unwrap();
    let mismatch = builder.add_edge(Edge::new(1, 4, 5, 1.0, geodetic));
    assert!(matches!(
        mismatch,
        Err(GraphError::SridMismatch(Srid::Wgs84, Srid::Planar))
    ));

    let vertex = Vertex::new(4, GeoPoint::wgs84(0.0, 0.0).unwrap());
    assert!(builder.add_vertex(vertex).is_err());

    assert_eq!(builder.size(), (0, 0));
}

#[test]
fn parallel_edges_last_wins() {
    let mut builder = EngineBuilder::new(EngineConfig::planar());

    builder
        .add_edge(Edge::new(1, 1, 2, 10.0, planar(wkt! { LINESTRING(0. 0., 1. 0.) })))
        .unwrap();
    builder
        .add_edge(Edge::new(2, 1, 2, 3.0, planar(wkt! { LINESTRING(0. 0., 0.5 0.5, 1. 0.) })))
        .unwrap();
    assert_eq!(builder.size(), (0, 1));

    let engine = builder.finalize().unwrap();
    assert_eq!(engine.edge_between(1, 2).map(|edge| edge.id), Some(2));
    assert!(engine.edge(1).is_none());
    assert_eq!(engine.graph().edge_count(), 1);
}

#[test]
fn missing_vertices_come_from_geometry() {
    let mut builder = EngineBuilder::new(EngineConfig::planar());
    builder
        .add_vertex(Vertex::new(1, GeoPoint::planar(-1.0, -1.0).unwrap()))
        .unwrap();
    builder
        .add_edge(Edge::new(7, 1, 2, 1.0, planar(wkt! { LINESTRING(0. 0., 1. 0.) })))
        .unwrap();

    let engine = builder.finalize().unwrap();

    // Explicit vertices keep their location
    assert_eq!(
        engine.vertex(1).map(|vertex| vertex.point),
        Some(GeoPoint::planar(-1.0, -1.0).unwrap())
    );
    assert_eq!(
        engine.vertex(2).map(|vertex| vertex.point),
        Some(GeoPoint::planar(1.0, 0.0).unwrap())
    );
}

#[test]
fn duplicate_edge_ids_fail_finalize() {
    let mut builder = EngineBuilder::new(EngineConfig::planar());
    builder
        .add_edge(Edge::new(1, 1, 2, 1.0, planar(wkt! { LINESTRING(0. 0., 1. 0.) })))
        .unwrap();
    builder
        .add_edge(Edge::new(1, 2, 3, 1.0, planar(wkt! { LINESTRING(1. 0., 2. 0.) })))
        .unwrap();

    let result = builder.finalize();
    assert!(matches!(
        result,
        Err(GraphError::Spatial(SpatialError::DuplicateEdge(1)))
    ));
}
