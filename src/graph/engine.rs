use crate::config::EngineConfig;
use crate::geo::Srid;
use crate::graph::{Components, Edge, EdgeId, RoadGraph, Vertex, VertexId};
use crate::route::GraphRouter;
use crate::spatial::Storage;

use rustc_hash::FxHashMap;
use std::fmt::{Debug, Formatter};

/// The immutable road engine.
///
/// Shared read-only by every request, which is why no method
/// takes `&mut self`. Obtained from [`EngineBuilder::finalize`](crate::graph::EngineBuilder::finalize).
pub struct MapEngine {
    config: EngineConfig,
    vertices: FxHashMap<VertexId, Vertex>,
    graph: RoadGraph,
    storage: Box<dyn Storage>,

    weak: Components,
    strong: Components,
}

impl Debug for MapEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MapEngine with Vertices: {}, Edges: {}",
            self.vertices.len(),
            self.storage.len()
        )
    }
}

impl MapEngine {
    pub(crate) fn new(
        config: EngineConfig,
        vertices: impl IntoIterator<Item = (VertexId, Vertex)>,
        graph: RoadGraph,
        storage: Box<dyn Storage>,
        weak: Components,
        strong: Components,
    ) -> Self {
        Self {
            config,
            vertices: vertices.into_iter().collect(),
            graph,
            storage,
            weak,
            strong,
        }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn srid(&self) -> Srid {
        self.config.srid
    }

    #[inline]
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.storage.get_edge(id)
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.storage.len()
    }

    /// The edge running from `source` to `target`, if any.
    pub fn edge_between(&self, source: VertexId, target: VertexId) -> Option<&Edge> {
        self.graph
            .edge_weight(source, target)
            .and_then(|thin| self.storage.get_edge(thin.id))
    }

    /// The edges of consecutive vertices along `path`.
    ///
    /// Pairs without a connecting edge are skipped.
    pub fn path_edges<'a>(&'a self, path: &'a [VertexId]) -> impl Iterator<Item = &'a Edge> + 'a {
        path.windows(2)
            .filter_map(|pair| self.edge_between(pair[0], pair[1]))
    }

    #[inline]
    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    #[inline]
    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }

    /// Labels under undirected reachability.
    #[inline]
    pub fn weak_components(&self) -> &Components {
        &self.weak
    }

    /// Labels under directed reachability.
    #[inline]
    pub fn strong_components(&self) -> &Components {
        &self.strong
    }

    /// The shortest path oracle over this engine's graph.
    #[inline]
    pub fn router(&self) -> GraphRouter<'_> {
        GraphRouter::new(&self.graph)
    }
}
