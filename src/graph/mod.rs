//! The road graph and its engine.
//!
//! A graph is assembled through an [`EngineBuilder`], one vertex and
//! edge at a time (or from a CSV file, see [`loader`]), and then frozen
//! into a [`MapEngine`] by [`EngineBuilder::finalize`]. The engine owns
//! the routing graph, the spatial index of edge polylines, and both
//! connectivity labellings, and is read-only from then on.
//!
//! ```rust
//! use horizon::config::EngineConfig;
//! use horizon::geo::{GeoPoint, Polyline};
//! use horizon::graph::{Edge, EngineBuilder};
//!
//! let a = GeoPoint::planar(0.0, 0.0).unwrap();
//! let b = GeoPoint::planar(3.0, 4.0).unwrap();
//! let line = Polyline::from_points(&[a, b]).unwrap();
//!
//! let mut builder = EngineBuilder::new(EngineConfig::planar());
//! builder.add_edge(Edge::new(1, 10, 20, 5.0, line)).unwrap();
//!
//! let engine = builder.finalize().unwrap();
//! assert_eq!(engine.edge_between(10, 20).map(|edge| edge.id), Some(1));
//! assert_eq!(engine.weak_components().total_components(), 1);
//! ```

use crate::geo::{GeoError, Srid};
use crate::impl_err;
use crate::spatial::SpatialError;

use petgraph::prelude::DiGraphMap;
use rustc_hash::FxHasher;
use std::hash::BuildHasherDefault;
use thiserror::Error;

#[doc(hidden)]
pub mod builder;
pub mod components;
#[doc(hidden)]
pub mod engine;
#[doc(hidden)]
pub mod item;
pub mod loader;

#[cfg(test)]
mod test;

#[doc(inline)]
pub use builder::EngineBuilder;
#[doc(inline)]
pub use components::{ComponentId, Components};
#[doc(inline)]
pub use engine::MapEngine;
#[doc(inline)]
pub use item::{Edge, EdgeId, EdgeRef, Vertex, VertexId, Weight};

/// The directed routing graph, keyed by vertex id.
///
/// Arcs carry the [`EdgeRef`] of the road edge they stand for.
pub type RoadGraph = DiGraphMap<VertexId, EdgeRef, BuildHasherDefault<FxHasher>>;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("edge {0} starts and ends at vertex {1}")]
    SelfLoop(EdgeId, VertexId),

    #[error("edge {0} has an invalid weight {1}")]
    InvalidWeight(EdgeId, Weight),

    #[error("element uses {0}, but the engine is built for {1}")]
    SridMismatch(Srid, Srid),

    #[error("row {0}: {1}")]
    InvalidRow(u64, String),

    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Geo(GeoError),

    #[error(transparent)]
    Spatial(SpatialError),
}

impl_err!(GraphError, Graph);
impl_err!(GeoError, GraphError, Geo);
impl_err!(SpatialError, GraphError, Spatial);
