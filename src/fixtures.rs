//! Graph fixtures shared by the unit tests.

use crate::config::EngineConfig;
use crate::graph::loader::load_engine;
use crate::graph::MapEngine;

use std::path::{Path, PathBuf};

/// Four disjoint planar networks of four vertices each.
///
/// ```text
/// net1: 0..=3   net2: 4..=7   net3: 8..=11   net4: 12..=15
/// ```
///
/// Every network is strongly connected, except for vertex 8,
/// which can only be left.
pub const FOUR_NETWORKS: &str = "four_networks.csv";

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join(name)
}

pub fn four_networks() -> MapEngine {
    load_engine(fixture_path(FOUR_NETWORKS), EngineConfig::planar())
        .expect("four networks fixture must load")
}
