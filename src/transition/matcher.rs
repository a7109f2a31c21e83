use crate::config::MatchOptions;
use crate::graph::MapEngine;
use crate::route::GraphRouter;
use crate::transition::*;

use itertools::Itertools;
use log::{debug, info};
use measure_time::debug_time;
use std::mem;

/// Fewest observations a trip may hold.
pub const MINIMUM_OBSERVATIONS: usize = 3;

/// Matches trips of observations onto the graph of a [`MapEngine`].
///
/// Each observation is given candidate positions upon nearby edges,
/// scored by the [emission](EmissionStrategy), and consecutive
/// candidates are joined by routes scored by the
/// [transition](TransitionStrategy). The [`Solver`] then decodes
/// the most likely sequence.
///
/// Where no route joins two consecutive observations, the trip is
/// split, and each part is decoded as its own [`SubMatch`].
pub struct MapMatcher<'a, E = GaussianEmission, T = ExponentialTransition, S = MaxPlusViterbi>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
    S: Solver,
{
    engine: &'a MapEngine,
    heuristics: CostingStrategies<E, T>,
    solver: S,
}

impl<'a> MapMatcher<'a> {
    /// A matcher costed with the parameters of the engine.
    pub fn new(engine: &'a MapEngine) -> Self {
        Self {
            engine,
            heuristics: CostingStrategies::from_parameters(engine.config().hmm),
            solver: MaxPlusViterbi,
        }
    }
}

impl<'a, E, T, S> MapMatcher<'a, E, T, S>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
    S: Solver,
{
    pub fn with_costing<E2, T2>(self, heuristics: CostingStrategies<E2, T2>) -> MapMatcher<'a, E2, T2, S>
    where
        E2: EmissionStrategy,
        T2: TransitionStrategy,
    {
        MapMatcher {
            engine: self.engine,
            heuristics,
            solver: self.solver,
        }
    }

    pub fn with_solver<S2: Solver>(self, solver: S2) -> MapMatcher<'a, E, T, S2> {
        MapMatcher {
            engine: self.engine,
            heuristics: self.heuristics,
            solver,
        }
    }

    fn validate(&self, observations: &[Observation], options: &MatchOptions) -> Result<(), MatchError> {
        if observations.len() < MINIMUM_OBSERVATIONS {
            return Err(MatchError::MinimumObservations(observations.len()));
        }

        if options.max_states == 0 {
            return Err(MatchError::InvalidParameter("max_states", 0.0));
        }

        let srid = self.engine.srid();
        if let Some((index, observation)) = observations
            .iter()
            .find_position(|observation| observation.point.srid() != srid)
        {
            return Err(MatchError::SridMismatch(index, observation.point.srid(), srid));
        }

        match observations
            .iter()
            .tuple_windows()
            .position(|(previous, next)| next.time < previous.time)
        {
            Some(index) => Err(MatchError::TimeInversion(index + 1)),
            None => Ok(()),
        }
    }

    /// Transition log-probabilities between two consecutive layers, `[from][to]`.
    fn transitions(
        &self,
        cache: &mut RouteCache<'_, GraphRouter<'_>>,
        observations: &[Observation],
        previous: &CandidateLayer,
        current: &CandidateLayer,
    ) -> Vec<Vec<f64>> {
        let (from, to) = (
            &observations[previous.observation],
            &observations[current.observation],
        );

        let linear_distance = from.point.distance(&to.point);
        let time_delta = to.seconds_since(from);

        let entries = current.states.iter().map(|state| state.source).unique().collect_vec();
        for exit in previous.states.iter().map(|state| state.target).unique() {
            cache.prefetch(exit, &entries);
        }

        previous
            .states
            .iter()
            .map(|source| {
                current
                    .states
                    .iter()
                    .map(|target| {
                        self.heuristics.transition(TransitionContext {
                            route_length: cache.length(source, target),
                            linear_distance,
                            time_delta,
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Matches the observations, given in chronological order.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(observations = observations.len()))
    )]
    pub fn run(&self, observations: &[Observation], options: &MatchOptions) -> Result<MatchResult, MatchError> {
        debug_time!("MapMatcher::run");
        self.validate(observations, options)?;

        let layers = LayerGenerator::new(self.engine, &self.heuristics, *options)
            .with_observations(observations);

        if layers.iter().all(CandidateLayer::is_empty) {
            return Err(MatchError::CandidatesNotFound);
        }

        let mut cache = RouteCache::new(self.engine.router(), self.engine.strong_components());

        let mut unmatched = vec![];
        let mut segments: Vec<Vec<CandidateLayer>> = vec![];
        let mut segment: Vec<CandidateLayer> = vec![];

        // States of the last layer which a finite path reaches
        let mut reachable: Vec<bool> = vec![];

        for mut layer in layers {
            if layer.is_empty() {
                debug!("Observation {} has no candidates", layer.observation);
                unmatched.push(ObservationResult::unmatched(
                    layer.observation,
                    observations[layer.observation],
                ));

                if !segment.is_empty() {
                    segments.push(mem::take(&mut segment));
                }
                continue;
            }

            if let Some(previous) = segment.last() {
                let transitions = self.transitions(&mut cache, observations, previous, &layer);
                let next = (0..layer.len())
                    .map(|to| {
                        reachable
                            .iter()
                            .zip(&transitions)
                            .any(|(reached, row)| *reached && row[to] > f64::NEG_INFINITY)
                    })
                    .collect::<Vec<_>>();

                if next.contains(&true) {
                    layer.transitions = transitions;
                    reachable = next;
                    segment.push(layer);
                    continue;
                }

                debug!(
                    "No route joins observations {} and {}, splitting",
                    previous.observation, layer.observation
                );
                segments.push(mem::take(&mut segment));
            }

            reachable = vec![true; layer.len()];
            segment.push(layer);
        }

        if !segment.is_empty() {
            segments.push(segment);
        }

        let sub_matches = segments
            .iter()
            .map(|segment| {
                let decoded = self.solver.solve(segment)?;
                SubMatch::assemble(self.engine, &mut cache, observations, segment, &decoded)
            })
            .collect::<Result<Vec<_>, MatchError>>()?;

        let code = if sub_matches.iter().any(|sub_match| sub_match.observations.len() > 1) {
            MatchCode::Ok
        } else {
            MatchCode::AloneObservation
        };

        info!(
            "Matched {} observations into {} sub-matches, {} without candidates",
            observations.len() - unmatched.len(),
            sub_matches.len(),
            unmatched.len()
        );

        Ok(MatchResult {
            sub_matches,
            unmatched,
            code,
        })
    }
}
