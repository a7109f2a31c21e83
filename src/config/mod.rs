//! Engine and request configuration.
//!
//! Engine settings may be loaded from the environment (and a `.env` file)
//! through [`EngineConfig::from_env`]:
//!
//! | Variable                  | Default   |
//! |---------------------------|-----------|
//! | `HORIZON_SRID`            | `4326`    |
//! | `HORIZON_CELL_RESOLUTION` | `10`      |
//! | `HORIZON_SIGMA`           | `4.07`    |
//! | `HORIZON_BETA`            | `0.00959442` |

use crate::geo::Srid;
use crate::impl_err;

use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Components below this many vertices are considered tiny.
pub const SMALL_COMPONENT_SIZE: usize = 1000;

/// Default GPS error deviation, in meters.
pub const DEFAULT_SIGMA: f64 = 4.07;

/// Default rate of the transition distribution.
pub const DEFAULT_BETA: f64 = 0.00959442;

pub const DEFAULT_MAX_STATES: usize = 5;
pub const MAX_STATES_LIMIT: usize = 10;

pub const DEFAULT_MATCH_RADIUS: f64 = 25.0;
pub const DEFAULT_SHORTEST_PATH_RADIUS: f64 = 100.0;
pub const DEFAULT_SHORTEST_PATH_CANDIDATES: usize = 10;
pub const DEFAULT_NEAREST_RADIUS: f64 = 25.0;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("environment variable {0} has an invalid value {1:?}")]
    InvalidVariable(&'static str, String),

    #[error("parameter {0} is out of range, given {1}")]
    OutOfRange(&'static str, f64),
}

impl_err!(ConfigError, Config);

fn read_env<T: FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidVariable(key, value)),
        Err(_) => Ok(None),
    }
}

/// Parameters fixed for the lifetime of a [`MapEngine`](crate::graph::MapEngine).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reference system of every vertex and edge.
    pub srid: Srid,

    /// H3 resolution of the geodetic spatial index.
    pub cell_resolution: u8,

    /// Strongly connected components smaller than this are marked tiny.
    pub small_component_size: usize,

    pub hmm: HmmParameters,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            srid: Srid::Wgs84,
            cell_resolution: crate::spatial::spherical::DEFAULT_RESOLUTION,
            small_component_size: SMALL_COMPONENT_SIZE,
            hmm: HmmParameters::default(),
        }
    }
}

impl EngineConfig {
    pub fn planar() -> Self {
        Self {
            srid: Srid::Planar,
            ..Self::default()
        }
    }

    /// Reads the configuration from the environment, after loading
    /// a `.env` file if one exists. Missing variables keep their
    /// defaults, unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv::dotenv();
        let mut config = EngineConfig::default();

        if let Some(code) = read_env::<u32>("HORIZON_SRID")? {
            config.srid = Srid::from_code(code)
                .map_err(|_| ConfigError::InvalidVariable("HORIZON_SRID", code.to_string()))?;
        }

        if let Some(resolution) = read_env::<u8>("HORIZON_CELL_RESOLUTION")? {
            config.cell_resolution = resolution;
        }

        let sigma = read_env::<f64>("HORIZON_SIGMA")?.unwrap_or(config.hmm.sigma);
        let beta = read_env::<f64>("HORIZON_BETA")?.unwrap_or(config.hmm.beta);
        config.hmm = HmmParameters::new(sigma, beta)?;

        Ok(config)
    }
}

/// Parameters of the hidden markov model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HmmParameters {
    /// Standard deviation of the GPS error, in meters.
    pub sigma: f64,

    /// Rate parameter of the exponential transition distribution.
    pub beta: f64,
}

impl Default for HmmParameters {
    fn default() -> Self {
        Self {
            sigma: DEFAULT_SIGMA,
            beta: DEFAULT_BETA,
        }
    }
}

impl HmmParameters {
    pub fn new(sigma: f64, beta: f64) -> Result<Self, ConfigError> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(ConfigError::OutOfRange("sigma", sigma));
        }

        if !(beta > 0.0 && beta.is_finite()) {
            return Err(ConfigError::OutOfRange("beta", beta));
        }

        Ok(Self { sigma, beta })
    }
}

/// A search radius around an observation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Radius {
    /// Only edges within this many meters (or planar units).
    Bounded(f64),
    /// The nearest edges, however far.
    Unbounded,
}

impl Radius {
    /// Applies the request convention: negative is unbounded,
    /// zero or missing is the given default.
    pub fn from_request(radius: Option<f64>, default: f64) -> Self {
        match radius {
            Some(radius) if radius < 0.0 => Radius::Unbounded,
            Some(radius) if radius > 0.0 => Radius::Bounded(radius),
            _ => Radius::Bounded(default),
        }
    }
}

/// Options of a single map-matching request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Upper bound on candidates per observation, within `[1, 10]`.
    pub max_states: usize,
    pub radius: Radius,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            max_states: DEFAULT_MAX_STATES,
            radius: Radius::Bounded(DEFAULT_MATCH_RADIUS),
        }
    }
}

impl MatchOptions {
    /// Builds options from raw request values, falling back to the
    /// defaults where values are missing or out of range.
    pub fn from_request(max_states: Option<usize>, radius: Option<f64>) -> Self {
        let max_states = match max_states {
            None => DEFAULT_MAX_STATES,
            Some(value) if (1..=MAX_STATES_LIMIT).contains(&value) => value,
            Some(value) => {
                warn!(
                    "max_states={value} outside of [1, {MAX_STATES_LIMIT}], using {DEFAULT_MAX_STATES}"
                );
                DEFAULT_MAX_STATES
            }
        };

        Self {
            max_states,
            radius: Radius::from_request(radius, DEFAULT_MATCH_RADIUS),
        }
    }
}

/// Options of a shortest path request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShortestPathOptions {
    pub radius: Radius,

    /// Number of candidate edges considered at either end.
    pub candidates: usize,
}

impl Default for ShortestPathOptions {
    fn default() -> Self {
        Self {
            radius: Radius::Bounded(DEFAULT_SHORTEST_PATH_RADIUS),
            candidates: DEFAULT_SHORTEST_PATH_CANDIDATES,
        }
    }
}

impl ShortestPathOptions {
    pub fn from_request(radius: Option<f64>) -> Self {
        Self {
            radius: Radius::from_request(radius, DEFAULT_SHORTEST_PATH_RADIUS),
            ..Self::default()
        }
    }
}

/// Options of an isochrone request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct IsochroneOptions {
    /// Largest accumulated cost still reported.
    pub max_cost: f64,

    /// Radius within which the source observation is snapped.
    pub nearest_radius: f64,
}

impl Default for IsochroneOptions {
    fn default() -> Self {
        Self {
            max_cost: 0.0,
            nearest_radius: DEFAULT_NEAREST_RADIUS,
        }
    }
}

impl IsochroneOptions {
    /// Negative values are rejected. Missing values take their defaults,
    /// as does a zero radius.
    pub fn from_request(
        max_cost: Option<f64>,
        nearest_radius: Option<f64>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let max_cost = max_cost.unwrap_or(defaults.max_cost);
        let nearest_radius = match nearest_radius {
            Some(radius) if radius != 0.0 => radius,
            _ => defaults.nearest_radius,
        };

        if max_cost < 0.0 || max_cost.is_nan() {
            return Err(ConfigError::OutOfRange("max_cost", max_cost));
        }

        if nearest_radius < 0.0 || nearest_radius.is_nan() {
            return Err(ConfigError::OutOfRange("nearest_radius", nearest_radius));
        }

        Ok(Self {
            max_cost,
            nearest_radius,
        })
    }
}
