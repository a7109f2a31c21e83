//! Matches a track onto a road graph, printing every sub-match as WKT.
//!
//! ```bash
//! RUST_LOG=info horizon graph.csv track.csv
//! ```
//!
//! The engine is configured from the environment, see
//! [`EngineConfig::from_env`](horizon::config::EngineConfig::from_env).

use horizon::config::{EngineConfig, MatchOptions};
use horizon::graph::loader::load_engine;
use horizon::transition::{read_observations, MapMatcher};
use horizon::util::trace::initialize_logger;

use log::info;
use std::fs::File;
use std::io::BufReader;
use wkt::ToWkt;

fn main() -> horizon::Result<()> {
    initialize_logger();
    #[cfg(feature = "tracing")]
    horizon::util::trace::initialize_tracer();

    let mut args = std::env::args_os().skip(1);
    let graph = args.next().expect("need a graph *.csv file as argument");
    let track = args.next().expect("need a track *.csv file as argument");

    let config = EngineConfig::from_env()?;
    let engine = load_engine(&graph, config)?;
    info!("Loaded {engine:?}");

    let observations = read_observations(BufReader::new(File::open(&track)?), engine.srid())?;
    let result = MapMatcher::new(&engine).run(&observations, &MatchOptions::default())?;

    println!("code;sub_match;probability;edges;geometry");
    for (index, sub_match) in result.sub_matches.iter().enumerate() {
        let edges = sub_match
            .matched_edges()
            .map(|edge| edge.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let geometry = sub_match
            .path
            .as_ref()
            .map(|path| path.line().wkt_string())
            .unwrap_or_default();

        println!(
            "{};{index};{};{edges};{geometry}",
            result.code.code(),
            sub_match.probability
        );
    }

    for unmatched in &result.unmatched {
        info!("Observation {} has no candidates", unmatched.observation.id);
    }

    Ok(())
}
