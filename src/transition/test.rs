use crate::config::{EngineConfig, HmmParameters, MatchOptions, Radius};
use crate::fixtures::four_networks;
use crate::geo::{GeoPoint, Polyline, Srid};
use crate::graph::{Edge, EngineBuilder, MapEngine};
use crate::transition::*;

use approx::assert_relative_eq;
use chrono::{DateTime, TimeDelta, Utc};
use geo::wkt;

const E2_TRIP: [(f64, f64); 7] = [
    (1.2, 1.5),
    (3.1, 0.3),
    (11.2, 0.8),
    (6.1, -8.7),
    (8.2, -8.2),
    (10.9, -9.9),
    (1.9, -4.2),
];

fn start() -> DateTime<Utc> {
    DateTime::from_timestamp(1_700_000_000, 0).unwrap()
}

/// Observations sharing a single timestamp.
fn trip(points: &[(f64, f64)]) -> Vec<Observation> {
    points
        .iter()
        .enumerate()
        .map(|(id, (x, y))| Observation::new(id as i64, start(), GeoPoint::planar(*x, *y).unwrap()))
        .collect()
}

fn matcher(engine: &MapEngine) -> MapMatcher<'_> {
    MapMatcher::new(engine)
        .with_costing(CostingStrategies::from_parameters(HmmParameters::new(3.0, 1.0).unwrap()))
}

fn options() -> MatchOptions {
    MatchOptions {
        max_states: 2,
        radius: Radius::Bounded(5.0),
    }
}

fn position(engine: &MapEngine, id: StateId, edge: u64, x: f64, y: f64) -> RoadPosition {
    let edge = engine.edge(edge).unwrap();
    let point = GeoPoint::planar(x, y).unwrap();
    RoadPosition::new(id, edge, edge.geometry.project(&point))
}

fn assert_points(line: &Polyline, expected: &[(f64, f64)]) {
    assert_eq!(line.len(), expected.len(), "{line:?}");
    for (point, (x, y)) in line.points().zip(expected) {
        assert_relative_eq!(point.x(), *x, epsilon = 1e-9);
        assert_relative_eq!(point.y(), *y, epsilon = 1e-9);
    }
}

#[test]
fn distributions() {
    assert_relative_eq!(normal_distribution(4.07, 0.0), 0.09802021631484832, epsilon = 1e-10);
    assert_relative_eq!(normal_distribution(4.07, 10.0), 0.004791019411082067, epsilon = 1e-10);
    assert_relative_eq!(log_normal_distribution(4.07, 0.0), -2.3225815326591763, epsilon = 1e-10);
    assert_relative_eq!(log_normal_distribution(4.07, 10.0), -5.341012069517231, epsilon = 1e-10);
    assert_relative_eq!(log_normal_distribution(50.0, 3.0), -4.832761538632819, epsilon = 1e-10);

    assert_relative_eq!(exponential_distribution(1.0, 2.5), 0.0820849986238988, epsilon = 1e-10);
    assert_relative_eq!(exponential_distribution(2.0, 7.0), 0.01509869171115925, epsilon = 1e-10);
    assert_relative_eq!(log_exponential_distribution(2.0, 7.0), -4.193147180559945, epsilon = 1e-10);

    // Exceeds one for a narrow distribution
    assert_relative_eq!(
        log_exponential_distribution(0.00959442, 0.0),
        4.646573599499615,
        epsilon = 1e-10
    );
}

#[test]
fn log_distributions_agree_with_densities() {
    let grid = (0..=400).map(|step| step as f64 * 0.25).collect::<Vec<_>>();

    for sigma in [0.5, 1.0, 3.0, 4.07, 50.0] {
        for &x in &grid {
            let density = normal_distribution(sigma, x);
            if density < f64::MIN_POSITIVE {
                continue;
            }

            let log = log_normal_distribution(sigma, x);
            assert!((log - density.ln()).abs() <= 1e-10, "sigma={sigma} x={x}");
        }
    }

    for beta in [0.00959442, 0.5, 1.0, 2.0, 10.0] {
        for &x in &grid {
            let density = exponential_distribution(beta, x);
            if density < f64::MIN_POSITIVE {
                continue;
            }

            let log = log_exponential_distribution(beta, x);
            assert!((log - density.ln()).abs() <= 1e-10, "beta={beta} x={x}");
        }
    }
}

#[test]
fn emission_prefers_observation_accuracy() {
    let costing = CostingStrategies::from_parameters(HmmParameters::new(3.0, 1.0).unwrap());

    let default = costing.emission(EmissionContext::new(1.5, None));
    assert_relative_eq!(default, -2.1425508218727822, epsilon = 1e-10);

    let accurate = costing.emission(EmissionContext::new(1.5, Some(2.0)));
    assert_relative_eq!(accurate, -1.893335713764618, epsilon = 1e-10);

    // A non-positive accuracy is ignored
    let ignored = costing.emission(EmissionContext::new(1.5, Some(0.0)));
    assert_eq!(ignored, default);
}

#[test]
fn transition_thresholds() {
    let transition = ExponentialTransition { beta: 1.0 };
    let context = |route_length| TransitionContext {
        route_length,
        linear_distance: 3.0,
        time_delta: 0.0,
    };

    assert_eq!(transition.log_probability(context(f64::INFINITY)), f64::NEG_INFINITY);
    assert_eq!(transition.log_probability(context(1e11)), -ROUTE_LENGTH_THRESHOLD);
    assert_relative_eq!(transition.log_probability(context(5.5)), -2.5, epsilon = 1e-12);
    assert_relative_eq!(transition.log_probability(context(0.5)), -2.5, epsilon = 1e-12);
}

#[test]
fn snap_vertex_at_midpoint_is_target() {
    let mut builder = EngineBuilder::new(EngineConfig::planar());
    let line = Polyline::new(Srid::Planar, wkt! { LINESTRING(0. 0., 2. 0.) }).unwrap();
    builder.add_edge(Edge::new(1, 10, 20, 2.0, line)).unwrap();
    let engine = builder.finalize().unwrap();

    let midpoint = position(&engine, 0, 1, 1.0, 1.0);
    assert_eq!(midpoint.projection.fraction, 0.5);
    assert_eq!(midpoint.snap_vertex, 20);

    let near_source = position(&engine, 1, 1, 0.5, 1.0);
    assert_eq!(near_source.snap_vertex, 20);

    let near_target = position(&engine, 2, 1, 1.5, 1.0);
    assert_eq!(near_target.snap_vertex, 10);
}

#[test]
fn candidates_are_nearest_first() {
    let engine = four_networks();
    let costing = CostingStrategies::from_parameters(HmmParameters::new(3.0, 1.0).unwrap());
    let generator = LayerGenerator::new(&engine, &costing, options());

    let layers = generator.with_observations(&trip(&E2_TRIP));
    assert_eq!(layers.len(), 7);

    for layer in &layers {
        assert!(layer.len() <= 2);
        assert_eq!(layer.emissions.len(), layer.len());
        assert!(layer.states.windows(2).all(|pair| pair[0].distance() <= pair[1].distance()));
    }

    // Identifiers follow observation order
    let ids = layers
        .iter()
        .flat_map(|layer| layer.states.iter().map(|state| state.id))
        .collect::<Vec<_>>();
    assert_eq!(ids, (0..ids.len()).collect::<Vec<_>>());
}

/// A two-way loop along `y = 0`, and one-way spurs at the given heights.
fn loop_and_spurs(small_component_size: usize, spurs: &[f64]) -> MapEngine {
    let mut builder = EngineBuilder::new(EngineConfig {
        small_component_size,
        ..EngineConfig::planar()
    });

    let line = |line: geo::LineString<f64>| Polyline::new(Srid::Planar, line).unwrap();
    builder.add_edge(Edge::new(10, 1, 2, 4.0, line(wkt! { LINESTRING(0. 0., 4. 0.) }))).unwrap();
    builder.add_edge(Edge::new(11, 2, 1, 4.0, line(wkt! { LINESTRING(4. 0., 0. 0.) }))).unwrap();

    for (index, y) in spurs.iter().enumerate() {
        let spur = geo::LineString::from(vec![(0.0, *y), (4.0, *y)]);
        let source = 3 + 2 * index as i64;
        builder
            .add_edge(Edge::new(20 + index as u64, source, source + 1, 4.0, line(spur)))
            .unwrap();
    }

    builder.finalize().unwrap()
}

#[test]
fn candidates_prefer_the_big_component() {
    let costing = CostingStrategies::from_parameters(HmmParameters::new(3.0, 1.0).unwrap());
    let observation = &trip(&[(1.0, 0.8)])[0];
    let single = MatchOptions {
        max_states: 1,
        radius: Radius::Bounded(5.0),
    };

    // The loop {1, 2} is big enough to be preferred over the nearer spur
    let engine = loop_and_spurs(2, &[1.0]);
    let generator = LayerGenerator::new(&engine, &costing, single);
    let candidates = generator.candidates(observation);
    assert_eq!(candidates.len(), 1);
    assert_ne!(candidates[0].edge, 20);
    assert!(engine.strong_components().in_big_component(candidates[0].snap_vertex));

    // Preferred candidates still come back nearest first
    let wide = MatchOptions {
        max_states: 3,
        ..single
    };
    let generator = LayerGenerator::new(&engine, &costing, wide);
    let edges = generator.candidates(observation).iter().map(|c| c.edge).collect::<Vec<_>>();
    assert_eq!(edges.len(), 3);
    assert_eq!(edges[0], 20);

    // With every component tiny, distance alone decides
    let engine = loop_and_spurs(1000, &[1.0]);
    let generator = LayerGenerator::new(&engine, &costing, single);
    let candidates = generator.candidates(observation);
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].edge, 20);
}

#[test]
fn preference_reaches_the_whole_radius() {
    let costing = CostingStrategies::from_parameters(HmmParameters::new(3.0, 1.0).unwrap());
    let observation = &trip(&[(1.0, 0.8)])[0];
    let single = MatchOptions {
        max_states: 1,
        radius: Radius::Bounded(5.0),
    };

    // Three spurs are nearer than the loop
    let engine = loop_and_spurs(2, &[1.0, 0.6, 1.3]);
    let generator = LayerGenerator::new(&engine, &costing, single);
    let candidates = generator.candidates(observation);

    assert_eq!(candidates.len(), 1);
    assert!([10, 11].contains(&candidates[0].edge));
    assert_relative_eq!(candidates[0].distance(), 0.8, epsilon = 1e-12);
}

#[test]
fn route_cache_lengths() {
    let engine = four_networks();
    let mut cache = RouteCache::new(engine.router(), engine.strong_components());

    let behind = position(&engine, 0, 0, 1.2, 1.3);
    let ahead = position(&engine, 1, 0, 1.6, 1.7);

    // Further along the same edge, directly
    assert_relative_eq!(cache.length(&behind, &ahead), 0.5656854249492379, epsilon = 1e-9);
    assert!(cache.intermediate(&behind, &ahead).is_empty());

    // Backwards, around the network and along the whole edge again
    assert_relative_eq!(cache.length(&ahead, &behind), 6.270922559717589, epsilon = 1e-9);
    assert_eq!(cache.intermediate(&ahead, &behind), vec![1, 2, 0]);

    // Across networks
    let elsewhere = position(&engine, 2, 8, 11.2, 0.8);
    assert_eq!(cache.length(&behind, &elsewhere), f64::INFINITY);
    assert!(cache.route(behind.target, elsewhere.source).is_none());
}

#[test]
fn route_length_charges_the_whole_next_edge() {
    let mut builder = EngineBuilder::new(EngineConfig::planar());
    let line = |line: geo::LineString<f64>| Polyline::new(Srid::Planar, line).unwrap();
    builder.add_edge(Edge::new(1, 0, 1, 10.0, line(wkt! { LINESTRING(0. 0., 10. 0.) }))).unwrap();
    builder.add_edge(Edge::new(2, 1, 2, 10.0, line(wkt! { LINESTRING(10. 0., 20. 0.) }))).unwrap();
    let engine = builder.finalize().unwrap();

    let mut cache = RouteCache::new(engine.router(), engine.strong_components());
    let first = position(&engine, 0, 1, 3.0, 1.0);
    let second = position(&engine, 1, 2, 17.0, 1.0);
    assert_relative_eq!(first.projection.fraction, 0.3, epsilon = 1e-12);
    assert_relative_eq!(second.projection.fraction, 0.7, epsilon = 1e-12);

    // Nothing is routed between the edges, the second is charged in full
    assert_eq!(cache.length(&first, &second), 10.0);
    assert_eq!(cache.intermediate(&first, &second), vec![1]);
}

#[test]
fn viterbi_decoding() {
    let state = RoadPosition {
        id: 0,
        edge: 0,
        source: 0,
        target: 1,
        weight: 1.0,
        snap_vertex: 1,
        projection: crate::geo::Projection {
            point: GeoPoint::planar(0.0, 0.0).unwrap(),
            fraction: 0.0,
            next: 1,
            distance: 0.0,
        },
    };

    let layers = vec![
        CandidateLayer {
            observation: 0,
            states: vec![state; 2],
            emissions: vec![-1.0, -2.0],
            transitions: vec![],
        },
        CandidateLayer {
            observation: 1,
            states: vec![state; 2],
            emissions: vec![-1.0, -1.0],
            transitions: vec![vec![f64::NEG_INFINITY, -5.0], vec![-1.0, -1.0]],
        },
    ];

    let path = MaxPlusViterbi.solve(&layers).unwrap();

    // 2·(-2) - 1 - 1 beats 2·(-1) - 5 - 1, and ties keep the first state
    assert_eq!(path.states, vec![1, 0]);
    assert_relative_eq!(path.probability, -6.0, epsilon = 1e-12);

    assert_eq!(MaxPlusViterbi.solve(&[]).unwrap(), ViterbiPath::default());
}

#[test_log::test]
fn four_networks_trip() {
    let engine = four_networks();
    let result = matcher(&engine).run(&trip(&E2_TRIP), &options()).unwrap();

    assert_eq!(result.code, MatchCode::Ok);
    assert!(result.unmatched.is_empty());
    assert_eq!(result.matched_count(), 7);

    let summary = result
        .sub_matches
        .iter()
        .map(|sub_match| sub_match.matched_edges().collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(summary, vec![vec![6, 4], vec![8], vec![13, 14, 15], vec![19]]);

    let probabilities = [
        -6.29147685931132,
        -4.047246303123193,
        -10.170168523819793,
        -4.041160343955208,
    ];
    for (sub_match, expected) in result.sub_matches.iter().zip(probabilities) {
        assert_relative_eq!(sub_match.probability, expected, epsilon = 1e-9);
    }

    let first = &result.sub_matches[0];
    assert!(first.observations.iter().all(|result| result.code == MatchCode::Ok));
    assert_eq!(first.observations[0].matched.as_ref().map(|m| m.vertex), Some(3));
    assert_points(
        first.path.as_ref().unwrap(),
        &[(1.291514143094842, 1.0607321131447587), (3.4, 1.5), (2.86, 0.42000000000000015)],
    );

    let alone = &result.sub_matches[1];
    assert_eq!(alone.observations[0].code, MatchCode::AloneObservation);
    assert_eq!(alone.observations[0].index, 2);

    assert_points(
        result.sub_matches[2].path.as_ref().unwrap(),
        &[
            (6.547058823529412, -8.811764705882352),
            (7.0, -7.0),
            (8.9, -9.3),
            (10.818883248730964, -10.095634517766499),
        ],
    );

    let indices = result.observations().iter().map(|result| result.index).collect::<Vec<_>>();
    assert_eq!(indices, (0..7).collect::<Vec<_>>());
}

#[test_log::test]
fn intermediate_edges() {
    let engine = four_networks();
    let observations = trip(&[(1.2, 1.3), (0.8, -0.8), (0.8, -0.6)]);
    let result = matcher(&engine).run(&observations, &options()).unwrap();

    assert_eq!(result.sub_matches.len(), 1);
    let sub_match = &result.sub_matches[0];

    assert_eq!(sub_match.matched_edges().collect::<Vec<_>>(), vec![6, 3, 3]);
    assert_relative_eq!(sub_match.probability, -10.738611880318325, epsilon = 1e-9);

    // 0 -> 3, then back down 3 -> 2 onto 2 -> 0
    let travelled = sub_match
        .observations
        .iter()
        .map(|result| result.next_edges.iter().map(|edge| edge.id).collect::<Vec<_>>())
        .collect::<Vec<_>>();
    assert_eq!(travelled, vec![vec![4], vec![], vec![]]);

    assert_points(
        sub_match.path.as_ref().unwrap(),
        &[
            (1.2515806988352745, 1.0524126455906821),
            (3.4, 1.5),
            (2.3, -0.7),
            (1.6982532751091701, 0.08689956331877735),
        ],
    );
}

#[test]
fn observations_without_candidates() {
    let engine = four_networks();

    let mut points = E2_TRIP.to_vec();
    points.insert(5, (100.0, 100.0));
    let result = matcher(&engine).run(&trip(&points), &options()).unwrap();

    assert_eq!(result.unmatched.len(), 1);
    assert_eq!(result.unmatched[0].index, 5);
    assert_eq!(result.unmatched[0].code, MatchCode::NoCandidates);
    assert!(!result.unmatched[0].is_matched());

    // The empty layer splits the third network in two
    assert_eq!(result.sub_matches.len(), 5);
    assert_eq!(result.matched_count(), 7);

    let far = trip(&[(100.0, 100.0), (101.0, 100.0), (102.0, 100.0)]);
    let error = matcher(&engine).run(&far, &options()).unwrap_err();
    assert_eq!(error, MatchError::CandidatesNotFound);

    let unbounded = MatchOptions {
        radius: Radius::Unbounded,
        ..options()
    };
    let result = matcher(&engine).run(&far, &unbounded).unwrap();
    assert!(result.unmatched.is_empty());
}

#[test]
fn rejected_trips() {
    let engine = four_networks();
    let matcher = matcher(&engine);

    let short = trip(&E2_TRIP[..2]);
    assert_eq!(
        matcher.run(&short, &options()).unwrap_err(),
        MatchError::MinimumObservations(2)
    );

    let mut inverted = trip(&E2_TRIP);
    inverted[1].time = start() + TimeDelta::seconds(10);
    inverted[2].time = start() + TimeDelta::seconds(5);
    assert_eq!(
        matcher.run(&inverted, &options()).unwrap_err(),
        MatchError::TimeInversion(2)
    );

    let mut geodetic = trip(&E2_TRIP);
    geodetic[0].point = GeoPoint::wgs84(1.2, 1.5).unwrap();
    assert_eq!(
        matcher.run(&geodetic, &options()).unwrap_err(),
        MatchError::SridMismatch(0, Srid::Wgs84, Srid::Planar)
    );

    let none = MatchOptions {
        max_states: 0,
        ..options()
    };
    assert!(matches!(
        matcher.run(&trip(&E2_TRIP), &none),
        Err(MatchError::InvalidParameter("max_states", _))
    ));
}

#[test]
fn reads_tracks() {
    let table = "id;time;x;y;accuracy
1;2024-05-01T10:00:00Z;1.2;1.5;
2;2024-05-01T10:00:05.5Z;3.1;0.3;4.5
";

    let observations = read_observations(table.as_bytes(), Srid::Planar).unwrap();
    assert_eq!(observations.len(), 2);
    assert_eq!(observations[0].accuracy, None);
    assert_eq!(observations[1].accuracy, Some(4.5));
    assert_eq!(observations[1].point, GeoPoint::planar(3.1, 0.3).unwrap());
    assert_eq!(observations[1].seconds_since(&observations[0]), 5.5);

    let table = "id;time;x;y
1;yesterday;1.2;1.5
";
    assert!(matches!(
        read_observations(table.as_bytes(), Srid::Planar),
        Err(MatchError::InvalidObservation(1, _))
    ));

    let table = "id;time;x;y
1;2024-05-01T10:00:00Z;200;1.5
";
    assert!(matches!(
        read_observations(table.as_bytes(), Srid::Wgs84),
        Err(MatchError::InvalidObservation(1, _))
    ));
}

#[test_log::test]
fn geodetic_trip() {
    let mut builder = EngineBuilder::new(EngineConfig::default());
    let street = [
        (1, 1, 2, wkt! { LINESTRING(37.60 55.75, 37.61 55.75) }),
        (2, 2, 3, wkt! { LINESTRING(37.61 55.75, 37.62 55.75) }),
    ];

    for (id, source, target, line) in street {
        let geometry = Polyline::new(Srid::Wgs84, line).unwrap();
        builder.add_edge(Edge::new(id, source, target, 625.8, geometry)).unwrap();
    }
    let engine = builder.finalize().unwrap();

    // A few meters north of the street
    let observations = [(37.602, 55.75005), (37.606, 55.75005), (37.614, 55.75004)]
        .iter()
        .enumerate()
        .map(|(id, (lon, lat))| {
            let time = start() + TimeDelta::seconds(30 * id as i64);
            Observation::new(id as i64, time, GeoPoint::wgs84(*lon, *lat).unwrap())
        })
        .collect::<Vec<_>>();

    let result = MapMatcher::new(&engine)
        .run(&observations, &MatchOptions::default())
        .unwrap();

    assert_eq!(result.code, MatchCode::Ok);
    assert_eq!(result.sub_matches.len(), 1);

    let sub_match = &result.sub_matches[0];
    assert_eq!(sub_match.matched_edges().collect::<Vec<_>>(), vec![1, 1, 2]);
    assert!(sub_match.probability.is_finite());

    let first = sub_match.observations[0].matched.as_ref().unwrap();
    assert_eq!(first.vertex, 2);
    assert!(first.projection.distance < 10.0);

    let path = sub_match.path.as_ref().unwrap();
    let (head, tail) = (path.first().unwrap(), path.last().unwrap());
    assert_relative_eq!(head.x(), 37.602, epsilon = 1e-5);
    assert_relative_eq!(tail.x(), 37.614, epsilon = 1e-5);
    assert_relative_eq!(tail.y(), 55.75, epsilon = 1e-5);
}
