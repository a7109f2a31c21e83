use crate::config::{MatchOptions, Radius};
use crate::geo::GeoPoint;
use crate::graph::MapEngine;
use crate::spatial::Neighbour;
use crate::transition::*;

use itertools::Itertools;
use log::debug;
use measure_time::debug_time;
use rayon::prelude::*;

/// How many more edges than `max_states` are fetched when candidates on
/// the dominant component are preferred and the radius is unbounded.
const PREFERENCE_POOL: usize = 2;

/// Generates the candidate layers of a trip.
///
/// Every observation is snapped to at most `max_states` edges
/// within the search radius, each projection forming a candidate.
///
/// When the biggest strongly connected component is not tiny,
/// candidates whose snap vertex lies within it are preferred over
/// nearer candidates elsewhere, which only fill the remaining slots.
/// Every edge within a bounded radius is considered for this.
pub struct LayerGenerator<'a, E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    engine: &'a MapEngine,
    heuristics: &'a CostingStrategies<E, T>,
    options: MatchOptions,
}

impl<'a, E, T> LayerGenerator<'a, E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    pub fn new(
        engine: &'a MapEngine,
        heuristics: &'a CostingStrategies<E, T>,
        options: MatchOptions,
    ) -> Self {
        Self {
            engine,
            heuristics,
            options,
        }
    }

    fn nearest(&self, point: &GeoPoint, n: usize) -> Vec<Neighbour> {
        let storage = self.engine.storage();

        match self.options.radius {
            Radius::Bounded(radius) => storage.find_nearest_in_radius(point, radius, n),
            Radius::Unbounded => storage.find_nearest(point, n),
        }
    }

    /// The candidates of a single observation, nearest first.
    pub fn candidates(&self, observation: &Observation) -> Vec<RoadPosition> {
        let strong = self.engine.strong_components();
        let prefer = strong
            .big_component_id()
            .is_some_and(|big| !strong.is_tiny(big));

        let max_states = self.options.max_states;
        let fetch = match (prefer, self.options.radius) {
            (false, _) => max_states,
            (true, Radius::Bounded(_)) => usize::MAX,
            (true, Radius::Unbounded) => max_states * PREFERENCE_POOL,
        };

        let positions = self
            .nearest(&observation.point, fetch)
            .into_iter()
            .filter_map(|neighbour| self.engine.edge(neighbour.edge))
            .map(|edge| RoadPosition::new(0, edge, edge.geometry.project(&observation.point)))
            .collect::<Vec<_>>();

        if !prefer {
            return positions;
        }

        // Stable, so each group keeps its distance order
        positions
            .into_iter()
            .sorted_by_key(|position| !strong.in_big_component(position.snap_vertex))
            .take(max_states)
            .sorted_by(|a, b| {
                a.distance()
                    .total_cmp(&b.distance())
                    .then_with(|| a.edge.cmp(&b.edge))
            })
            .collect()
    }

    /// Generates one layer per observation, in parallel.
    ///
    /// State identifiers are then assigned in observation order,
    /// so they are unique and stable across runs.
    pub fn with_observations(&self, observations: &[Observation]) -> Vec<CandidateLayer> {
        debug_time!("LayerGenerator::with_observations");

        let mut layers = observations
            .par_iter()
            .enumerate()
            .map(|(index, observation)| {
                let states = self.candidates(observation);
                let emissions = states
                    .iter()
                    .map(|state| {
                        self.heuristics
                            .emission(EmissionContext::new(state.distance(), observation.accuracy))
                    })
                    .collect();

                CandidateLayer {
                    observation: index,
                    states,
                    emissions,
                    transitions: vec![],
                }
            })
            .collect::<Vec<_>>();

        let mut next_id: StateId = 0;
        for layer in &mut layers {
            for state in &mut layer.states {
                state.id = next_id;
                next_id += 1;
            }
        }

        debug!("Generated {next_id} candidates over {} layers", layers.len());
        layers
    }
}
