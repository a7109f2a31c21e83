//! Ancillary queries over a [`MapEngine`](crate::graph::MapEngine),
//! answered without the hidden markov model.
//!
//! - [`MapEngine::shortest_path`](crate::graph::MapEngine::shortest_path)
//!   routes between the best pair of snapped endpoints.
//! - [`MapEngine::isochrones`](crate::graph::MapEngine::isochrones)
//!   lists every vertex reachable within a cost budget.

use crate::geo::Srid;
use crate::graph::VertexId;
use crate::impl_err;

use thiserror::Error;

#[doc(hidden)]
pub mod isochrones;
#[doc(hidden)]
pub mod shortest_path;


#[doc(inline)]
pub use isochrones::Isochrone;
#[doc(inline)]
pub use shortest_path::ShortestPath;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("no edge found near the source")]
    SourceNotFound,

    #[error("no edge found near the target")]
    TargetNotFound,

    #[error("vertices {0} and {1} are in different components")]
    DifferentComponents(VertexId, VertexId),

    #[error("no path joins vertices {0} and {1}")]
    PathNotFound(VertexId, VertexId),

    #[error("source and target both snap to vertex {0}")]
    SameVertex(VertexId),

    #[error("query is in {0}, but the engine is in {1}")]
    SridMismatch(Srid, Srid),

    #[error("invalid {0}: {1}")]
    InvalidParameter(&'static str, f64),
}

impl_err!(QueryError, Query);
