//! Spatial indices over edge polylines.
//!
//! Two interchangeable back-ends implement [`Storage`]:
//!
//! - [`SphericalStorage`], for geodetic edges, buckets every edge into
//!   the hexagonal H3 cells its polyline passes through.
//! - [`PlanarStorage`], for cartesian edges, keeps an R-tree of
//!   polyline bounding boxes.
//!
//! Both hold the edges in insertion order, and answer every
//! query with exact point-to-polyline distances.

use crate::geo::{GeoPoint, Srid};
use crate::graph::{Edge, EdgeId};
use crate::impl_err;

use rustc_hash::FxHashMap;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use thiserror::Error;

#[doc(hidden)]
pub mod planar;
#[doc(hidden)]
pub mod spherical;


#[doc(inline)]
pub use planar::PlanarStorage;
#[doc(inline)]
pub use spherical::SphericalStorage;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpatialError {
    #[error("edge {0} uses {1}, but the storage indexes {2}")]
    SridMismatch(EdgeId, Srid, Srid),

    #[error("edge {0} was already added")]
    DuplicateEdge(EdgeId),

    #[error("invalid cell resolution {0}")]
    InvalidResolution(u8),

    #[error("edge {0} cannot be indexed: {1}")]
    Unindexable(EdgeId, String),
}

impl_err!(SpatialError, Spatial);

/// An edge found by a spatial query, and its distance to the query point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbour {
    pub edge: EdgeId,
    pub distance: f64,
}

impl Eq for Neighbour {}

impl PartialOrd for Neighbour {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Neighbour {
    /// Nearest first, ties are resolved by the lower edge id.
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance
            .total_cmp(&other.distance)
            .then_with(|| self.edge.cmp(&other.edge))
    }
}

/// Capability shared by every spatial back-end.
///
/// The storage is filled once, using [`Storage::add_edge`], after which
/// every query is a pure read, so a storage may be shared across threads.
pub trait Storage: Send + Sync {
    /// The reference system of every edge within the storage.
    fn srid(&self) -> Srid;

    /// Inserts an edge. Edges must share the storage reference
    /// system and carry a unique identifier.
    fn add_edge(&mut self, edge: Edge) -> Result<(), SpatialError>;

    /// Returns the exact edge handed to [`Storage::add_edge`].
    fn get_edge(&self, id: EdgeId) -> Option<&Edge>;

    /// Number of edges held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All edges with a point within `radius` of `point`, mapped to
    /// their distance from it. An infinite radius scans every edge.
    fn find_in_radius(&self, point: &GeoPoint, radius: f64) -> FxHashMap<EdgeId, f64>;

    /// The `n` nearest edges within `radius` of `point`, nearest first.
    fn find_nearest_in_radius(&self, point: &GeoPoint, radius: f64, n: usize) -> Vec<Neighbour> {
        let mut heap = self
            .find_in_radius(point, radius)
            .into_iter()
            .map(|(edge, distance)| Reverse(Neighbour { edge, distance }))
            .collect::<BinaryHeap<_>>();

        std::iter::from_fn(|| heap.pop().map(|Reverse(neighbour)| neighbour))
            .take(n)
            .collect()
    }

    /// The `n` nearest edges to `point` without any distance bound, nearest first.
    fn find_nearest(&self, point: &GeoPoint, n: usize) -> Vec<Neighbour>;
}

/// Creates the storage back-end matching the reference system,
/// with `resolution` applying only to geodetic storage.
pub fn new_storage(srid: Srid, resolution: u8) -> Result<Box<dyn Storage>, SpatialError> {
    Ok(match srid {
        Srid::Wgs84 => Box::new(SphericalStorage::new(resolution)?),
        Srid::Planar => Box::new(PlanarStorage::new()),
    })
}

/// Insertion-ordered edge arena, shared by the storage back-ends.
///
/// Indices into the arena are stable for the lifetime of the storage.
#[derive(Debug, Default)]
pub(crate) struct EdgeArena {
    edges: Vec<Edge>,
    lookup: FxHashMap<EdgeId, usize>,
}

impl EdgeArena {
    /// Appends an edge, returning its index.
    pub(crate) fn push(&mut self, srid: Srid, edge: Edge) -> Result<usize, SpatialError> {
        if edge.srid() != srid {
            return Err(SpatialError::SridMismatch(edge.id, edge.srid(), srid));
        }

        if self.lookup.contains_key(&edge.id) {
            return Err(SpatialError::DuplicateEdge(edge.id));
        }

        let index = self.edges.len();
        self.lookup.insert(edge.id, index);
        self.edges.push(edge);

        Ok(index)
    }

    #[inline]
    pub(crate) fn get(&self, id: EdgeId) -> Option<&Edge> {
        self.lookup.get(&id).and_then(|index| self.edges.get(*index))
    }

    #[inline]
    pub(crate) fn at(&self, index: usize) -> Option<&Edge> {
        self.edges.get(index)
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.edges.len()
    }

    /// Exact distance from `point` to the polyline of the edge at `index`.
    #[inline]
    pub(crate) fn distance(&self, index: usize, point: &GeoPoint) -> Option<(EdgeId, f64)> {
        self.at(index)
            .map(|edge| (edge.id, edge.geometry.project(point).distance))
    }
}
