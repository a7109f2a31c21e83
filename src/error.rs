use crate::config::ConfigError;
use crate::geo::GeoError;
use crate::graph::GraphError;
use crate::query::QueryError;
use crate::spatial::SpatialError;
use crate::transition::MatchError;

use thiserror::Error;

/// Any failure of the crate, wrapping the error of the module it arose in.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Geo(GeoError),

    #[error(transparent)]
    Spatial(SpatialError),

    #[error(transparent)]
    Graph(GraphError),

    #[error(transparent)]
    Match(MatchError),

    #[error(transparent)]
    Query(QueryError),

    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
