use crate::config::IsochroneOptions;
use crate::geo::GeoPoint;
use crate::graph::{MapEngine, Vertex, Weight};
use crate::query::QueryError;
use crate::route::RouteOracle;
use crate::transition::RoadPosition;

use itertools::Itertools;
use log::{debug, warn};

/// A vertex reachable within the budget, and the cost of reaching it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Isochrone {
    pub vertex: Vertex,
    pub cost: Weight,
}

impl MapEngine {
    /// Every vertex reachable from the observation at a cost of at most
    /// `max_cost`, cheapest first and then by vertex id.
    ///
    /// The observation is snapped to its nearest edge, then to the
    /// vertex of that edge chosen by the projection.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn isochrones(
        &self,
        source: &GeoPoint,
        options: &IsochroneOptions,
    ) -> Result<Vec<Isochrone>, QueryError> {
        if source.srid() != self.srid() {
            return Err(QueryError::SridMismatch(source.srid(), self.srid()));
        }

        if options.max_cost < 0.0 || options.max_cost.is_nan() {
            return Err(QueryError::InvalidParameter("max_cost", options.max_cost));
        }

        let edge = self
            .storage()
            .find_nearest_in_radius(source, options.nearest_radius, 1)
            .first()
            .and_then(|neighbour| self.edge(neighbour.edge))
            .ok_or(QueryError::SourceNotFound)?;

        let start = RoadPosition::new(0, edge, edge.geometry.project(source)).snap_vertex;
        debug!("Isochrones from {start} within {}", options.max_cost);

        let isochrones = self
            .router()
            .isochrones(start, options.max_cost)
            .into_iter()
            .filter_map(|(id, cost)| match self.vertex(id) {
                Some(vertex) => Some(Isochrone {
                    vertex: *vertex,
                    cost,
                }),
                None => {
                    warn!("Vertex {id} is reachable, but not part of the engine");
                    None
                }
            })
            .sorted_by(|a, b| {
                a.cost
                    .total_cmp(&b.cost)
                    .then_with(|| a.vertex.id.cmp(&b.vertex.id))
            })
            .collect();

        Ok(isochrones)
    }
}
