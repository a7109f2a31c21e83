use crate::graph::{Components, VertexId};
use crate::route::{Path, RouteOracle};
use crate::transition::{RoadPosition, StateId};

use itertools::Itertools;
use log::trace;
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Read-through cache of the routes queried during a single match.
///
/// Vertex-to-vertex routes are shared between every pair of
/// candidates which leave and enter through the same vertices,
/// and the route length between two candidates is computed at most once.
///
/// Vertices known to lie in distinct strongly connected components
/// are never routed, as no path can join them.
pub struct RouteCache<'a, R: RouteOracle> {
    oracle: R,
    strong: &'a Components,

    routes: FxHashMap<(VertexId, VertexId), Option<Arc<Path>>>,
    lengths: FxHashMap<(StateId, StateId), f64>,
}

impl<'a, R: RouteOracle> RouteCache<'a, R> {
    pub fn new(oracle: R, strong: &'a Components) -> Self {
        Self {
            oracle,
            strong,
            routes: FxHashMap::default(),
            lengths: FxHashMap::default(),
        }
    }

    fn routable(&self, source: VertexId, target: VertexId) -> bool {
        match (self.strong.component(source), self.strong.component(target)) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }

    /// Resolves the routes from `source` to every target in one query.
    pub fn prefetch(&mut self, source: VertexId, targets: &[VertexId]) {
        let (routable, unroutable): (Vec<_>, Vec<_>) = targets
            .iter()
            .copied()
            .unique()
            .filter(|target| !self.routes.contains_key(&(source, *target)))
            .partition(|target| self.routable(source, *target));

        for target in unroutable {
            self.routes.insert((source, target), None);
        }

        if routable.is_empty() {
            return;
        }

        trace!("Prefetching {} routes from {source}", routable.len());
        let paths = self.oracle.shortest_path_one_to_many(source, &routable);
        for (target, path) in routable.into_iter().zip(paths) {
            self.routes.insert((source, target), path.map(Arc::new));
        }
    }

    /// The cheapest route between two vertices, `None` if there is none.
    pub fn route(&mut self, source: VertexId, target: VertexId) -> Option<Arc<Path>> {
        if let Some(route) = self.routes.get(&(source, target)) {
            return route.clone();
        }

        let route = if self.routable(source, target) {
            self.oracle.shortest_path(source, target).map(Arc::new)
        } else {
            None
        };

        self.routes.insert((source, target), route.clone());
        route
    }

    /// Length of the travel between two candidates, infinite if impossible.
    ///
    /// A candidate further along the same edge is reached directly.
    /// Otherwise the route from the end of the first edge to the start
    /// of the second is taken, and the whole second edge is charged.
    pub fn length(&mut self, from: &RoadPosition, to: &RoadPosition) -> f64 {
        if let Some(length) = self.lengths.get(&(from.id, to.id)) {
            return *length;
        }

        let length = if from.precedes_on_edge(to) {
            from.projection.point.distance(&to.projection.point)
        } else {
            match self.route(from.target, to.source) {
                Some(path) => path.cost + to.weight,
                None => f64::INFINITY,
            }
        };

        self.lengths.insert((from.id, to.id), length);
        length
    }

    /// Vertices travelled between two candidates, from leaving the first
    /// edge to entering the second. Empty when no routing is involved.
    pub fn intermediate(&mut self, from: &RoadPosition, to: &RoadPosition) -> Vec<VertexId> {
        if from.precedes_on_edge(to) {
            return vec![];
        }

        self.route(from.target, to.source)
            .map(|path| path.vertices.clone())
            .unwrap_or_default()
    }
}
