use crate::config::{Radius, ShortestPathOptions};
use crate::geo::{GeoPoint, Polyline};
use crate::graph::{Components, MapEngine, Weight};
use crate::query::QueryError;
use crate::route::RouteOracle;
use crate::transition::{
    EdgeResult, MatchCode, MatchResult, MatchedPosition, Observation, ObservationResult, RoadPosition,
    SubMatch,
};

use log::debug;

/// Probability reported for the single sub-match of a routed path.
pub const SHORTEST_PATH_PROBABILITY: f64 = 100.0;

/// A routed path between two observations.
#[derive(Clone, Debug, PartialEq)]
pub struct ShortestPath {
    pub cost: Weight,

    /// A single sub-match of both observations, the source
    /// carrying the edges travelled in between.
    pub result: MatchResult,
}

impl ShortestPath {
    /// The travelled geometry, every routed edge end to end.
    pub fn path(&self) -> Option<&Polyline> {
        self.result
            .sub_matches
            .first()
            .and_then(|sub_match| sub_match.path.as_ref())
    }
}

/// The pair of candidates nearest in sum whose snap vertices satisfy `accept`.
fn closest_pair<'a>(
    sources: &'a [RoadPosition],
    targets: &'a [RoadPosition],
    accept: impl Fn(&RoadPosition, &RoadPosition) -> bool,
) -> Option<(&'a RoadPosition, &'a RoadPosition)> {
    let mut best: Option<(f64, &RoadPosition, &RoadPosition)> = None;

    for source in sources {
        for target in targets {
            if !accept(source, target) {
                continue;
            }

            let sum = source.distance() + target.distance();
            if best.map_or(true, |(current, _, _)| sum < current) {
                best = Some((sum, source, target));
            }
        }
    }

    best.map(|(_, source, target)| (source, target))
}

/// Prefers a pair within the biggest weak component, then any pair sharing one.
fn select_pair<'a>(
    weak: &Components,
    sources: &'a [RoadPosition],
    targets: &'a [RoadPosition],
) -> Option<(&'a RoadPosition, &'a RoadPosition)> {
    closest_pair(sources, targets, |source, target| {
        weak.in_big_component(source.snap_vertex) && weak.in_big_component(target.snap_vertex)
    })
    .or_else(|| {
        closest_pair(sources, targets, |source, target| {
            weak.same_component(source.snap_vertex, target.snap_vertex)
        })
    })
}

impl MapEngine {
    fn snap_candidates(&self, point: &GeoPoint, options: &ShortestPathOptions) -> Vec<RoadPosition> {
        let neighbours = match options.radius {
            Radius::Bounded(radius) => {
                self.storage()
                    .find_nearest_in_radius(point, radius, options.candidates)
            }
            Radius::Unbounded => self.storage().find_nearest(point, options.candidates),
        };

        neighbours
            .into_iter()
            .filter_map(|neighbour| self.edge(neighbour.edge))
            .map(|edge| RoadPosition::new(0, edge, edge.geometry.project(point)))
            .collect()
    }

    /// The cheapest route between two observations.
    ///
    /// Both ends are snapped to their nearby edges, and the closest pair
    /// of snap vertices sharing a weak component is routed, preferring
    /// the biggest component.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub fn shortest_path(
        &self,
        source: &Observation,
        target: &Observation,
        options: &ShortestPathOptions,
    ) -> Result<ShortestPath, QueryError> {
        for observation in [source, target] {
            if observation.point.srid() != self.srid() {
                return Err(QueryError::SridMismatch(observation.point.srid(), self.srid()));
            }
        }

        let sources = self.snap_candidates(&source.point, options);
        let Some(nearest_source) = sources.first() else {
            return Err(QueryError::SourceNotFound);
        };

        let targets = self.snap_candidates(&target.point, options);
        let Some(nearest_target) = targets.first() else {
            return Err(QueryError::TargetNotFound);
        };

        let (from, to) = select_pair(self.weak_components(), &sources, &targets).ok_or(
            QueryError::DifferentComponents(nearest_source.snap_vertex, nearest_target.snap_vertex),
        )?;

        debug!("Routing {} -> {}", from.snap_vertex, to.snap_vertex);
        let route = self
            .router()
            .shortest_path(from.snap_vertex, to.snap_vertex)
            .ok_or(QueryError::PathNotFound(from.snap_vertex, to.snap_vertex))?;

        if route.vertices.len() < 2 {
            return Err(QueryError::SameVertex(from.snap_vertex));
        }

        let edges = self.path_edges(&route.vertices).collect::<Vec<_>>();
        let (Some(first), Some(last)) = (edges.first(), edges.last()) else {
            return Err(QueryError::PathNotFound(from.snap_vertex, to.snap_vertex));
        };

        let mut path = first.geometry.clone();
        for edge in &edges[1..] {
            path.extend(&edge.geometry);
        }

        let middle = edges
            .iter()
            .skip(1)
            .take(edges.len().saturating_sub(2))
            .map(|edge| EdgeResult::from(*edge))
            .collect();

        let observations = vec![
            ObservationResult {
                index: 0,
                observation: *source,
                code: MatchCode::Ok,
                matched: Some(MatchedPosition {
                    edge: (*first).clone(),
                    vertex: from.snap_vertex,
                    projection: first.geometry.project(&source.point),
                }),
                next_edges: middle,
            },
            ObservationResult {
                index: 1,
                observation: *target,
                code: MatchCode::Ok,
                matched: Some(MatchedPosition {
                    edge: (*last).clone(),
                    vertex: to.snap_vertex,
                    projection: last.geometry.project(&target.point),
                }),
                next_edges: vec![],
            },
        ];

        Ok(ShortestPath {
            cost: route.cost,
            result: MatchResult {
                sub_matches: vec![SubMatch {
                    observations,
                    probability: SHORTEST_PATH_PROBABILITY,
                    path: Some(path),
                }],
                unmatched: vec![],
                code: MatchCode::Ok,
            },
        })
    }
}
