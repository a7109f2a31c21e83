use crate::geo::Projection;
use crate::graph::{Edge, EdgeId, VertexId, Weight};

/// Identifier of a candidate, unique within a single match.
pub type StateId = usize;

/// A hypothesised road position for one observation.
///
/// The vehicle may be at the projected point upon the edge. The
/// [`snap_vertex`](#structfield.snap_vertex) is the end of the edge
/// farther along the polyline from the projection, where a fraction
/// strictly above one half resolves to the source.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoadPosition {
    pub id: StateId,

    pub edge: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub weight: Weight,

    pub snap_vertex: VertexId,
    pub projection: Projection,
}

impl RoadPosition {
    pub fn new(id: StateId, edge: &Edge, projection: Projection) -> Self {
        let snap_vertex = if projection.fraction > 0.5 {
            edge.source
        } else {
            edge.target
        };

        Self {
            id,
            edge: edge.id,
            source: edge.source,
            target: edge.target,
            weight: edge.weight,
            snap_vertex,
            projection,
        }
    }

    /// Distance from the observation to the projected point.
    #[inline]
    pub fn distance(&self) -> f64 {
        self.projection.distance
    }

    /// Whether `next` lies further along the same edge, so that
    /// no routing is needed to get there.
    #[inline]
    pub fn precedes_on_edge(&self, next: &RoadPosition) -> bool {
        self.edge == next.edge && next.projection.fraction >= self.projection.fraction
    }
}
