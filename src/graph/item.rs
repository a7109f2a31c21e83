use crate::geo::{GeoPoint, Polyline, Srid};

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};

/// Opaque vertex identifier, no density is assumed.
pub type VertexId = i64;

/// Globally unique edge identifier.
pub type EdgeId = u64;

pub type Weight = f64;

/// A graph vertex and its location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    pub id: VertexId,
    pub point: GeoPoint,
}

impl Vertex {
    pub const fn new(id: VertexId, point: GeoPoint) -> Self {
        Self { id, point }
    }
}

/// A directed road edge.
///
/// The first point of the [`geometry`](#field.geometry) lies near the
/// `source` vertex, the last near the `target` vertex.
#[derive(Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub weight: Weight,
    pub geometry: Polyline,
}

impl Debug for Edge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Edge({}: {} -> {}, w={})",
            self.id, self.source, self.target, self.weight
        )
    }
}

impl Edge {
    pub fn new(
        id: EdgeId,
        source: VertexId,
        target: VertexId,
        weight: Weight,
        geometry: Polyline,
    ) -> Self {
        Self {
            id,
            source,
            target,
            weight,
            geometry,
        }
    }

    #[inline]
    pub fn srid(&self) -> Srid {
        self.geometry.srid()
    }

    /// The geometric length of the edge, unrelated to its weight.
    #[inline]
    pub fn length(&self) -> f64 {
        self.geometry.length()
    }

    /// A lightweight handle to the edge.
    #[inline]
    pub const fn thin(&self) -> EdgeRef {
        EdgeRef {
            id: self.id,
            weight: self.weight,
        }
    }
}

/// The weight of a graph arc, alongside the edge it belongs to.
///
/// This is what the routing graph stores, while the full [`Edge`]
/// geometry stays within the spatial storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub id: EdgeId,
    pub weight: Weight,
}
