use crate::config::EngineConfig;
use crate::graph::components::{strong_components, weak_components};
use crate::graph::{Edge, GraphError, MapEngine, RoadGraph, Vertex, VertexId};
use crate::spatial::new_storage;

use indexmap::IndexMap;
use log::{debug, info};
use measure_time::debug_time;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
#[cfg(feature = "tracing")]
use tracing::Level;

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Collects vertices and edges, before freezing them into a [`MapEngine`].
///
/// Insertion order is kept throughout, so engines built from
/// the same input always label their components identically.
#[derive(Debug)]
pub struct EngineBuilder {
    config: EngineConfig,
    vertices: FxIndexMap<VertexId, Vertex>,
    edges: FxIndexMap<(VertexId, VertexId), Edge>,
}

impl EngineBuilder {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            vertices: FxIndexMap::default(),
            edges: FxIndexMap::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of vertices and edges added so far.
    pub fn size(&self) -> (usize, usize) {
        (self.vertices.len(), self.edges.len())
    }

    /// Adds (or relocates) a vertex.
    pub fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError> {
        if vertex.point.srid() != self.config.srid {
            return Err(GraphError::SridMismatch(vertex.point.srid(), self.config.srid));
        }

        self.vertices.insert(vertex.id, vertex);
        Ok(())
    }

    /// Adds a directed edge.
    ///
    /// A second edge between the same pair of vertices replaces
    /// the first. Self-loops and negative weights are rejected.
    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if edge.srid() != self.config.srid {
            return Err(GraphError::SridMismatch(edge.srid(), self.config.srid));
        }

        if edge.source == edge.target {
            return Err(GraphError::SelfLoop(edge.id, edge.source));
        }

        if !(edge.weight >= 0.0 && edge.weight.is_finite()) {
            return Err(GraphError::InvalidWeight(edge.id, edge.weight));
        }

        if let Some(previous) = self.edges.insert((edge.source, edge.target), edge) {
            debug!("Parallel edge replaced edge {}", previous.id);
        }

        Ok(())
    }

    /// Freezes the builder, indexing every edge and labelling components.
    ///
    /// Vertices which were never added explicitly are placed at
    /// the matching end of the first edge that mentions them.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, level = Level::INFO))]
    pub fn finalize(self) -> Result<MapEngine, GraphError> {
        debug_time!("EngineBuilder::finalize");

        let EngineBuilder {
            config,
            mut vertices,
            edges,
        } = self;

        info!(
            "Finalizing engine with {} vertices and {} edges",
            vertices.len(),
            edges.len()
        );

        let mut graph = RoadGraph::default();
        let mut storage = new_storage(config.srid, config.cell_resolution)?;

        for vertex in vertices.keys() {
            graph.add_node(*vertex);
        }

        for edge in edges.into_values() {
            if let Some(point) = edge.geometry.first() {
                vertices
                    .entry(edge.source)
                    .or_insert_with(|| Vertex::new(edge.source, point));
            }

            if let Some(point) = edge.geometry.last() {
                vertices
                    .entry(edge.target)
                    .or_insert_with(|| Vertex::new(edge.target, point));
            }

            graph.add_edge(edge.source, edge.target, edge.thin());
            storage.add_edge(edge)?;
        }

        let (weak, strong) = {
            debug_time!("connectivity labelling");
            (
                weak_components(&graph, config.small_component_size),
                strong_components(&graph, config.small_component_size),
            )
        };

        info!(
            "Found {} weak components (biggest has {} vertices) and {} strong components (biggest has {} vertices)",
            weak.total_components(),
            weak.big_component_id().and_then(|id| weak.size(id)).unwrap_or(0),
            strong.total_components(),
            strong.big_component_id().and_then(|id| strong.size(id)).unwrap_or(0),
        );

        Ok(MapEngine::new(config, vertices, graph, storage, weak, strong))
    }
}
