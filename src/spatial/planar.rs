use crate::geo::{GeoPoint, Srid};
use crate::graph::{Edge, EdgeId};
use crate::spatial::{EdgeArena, Neighbour, SpatialError, Storage};

use geo::{BoundingRect, Point};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use rustc_hash::FxHashMap;
use std::collections::BinaryHeap;
use std::fmt::{Debug, Formatter};

/// Expansion applied to every bounding box, so that axis-aligned
/// edges never produce an empty rectangle.
const ENVELOPE_EPSILON: f64 = 1e-4;

/// Bounding box of a single edge polyline within the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
struct EdgeEnvelope {
    index: usize,
    envelope: AABB<Point>,
}

impl RTreeObject for EdgeEnvelope {
    type Envelope = AABB<Point>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

impl PointDistance for EdgeEnvelope {
    /// Squared distance to the box, a lower bound of the squared
    /// distance to the polyline inside it.
    fn distance_2(&self, point: &Point) -> f64 {
        self.envelope.distance_2(point)
    }
}

/// Cartesian edge storage over an R-tree of polyline bounding boxes.
#[derive(Default)]
pub struct PlanarStorage {
    arena: EdgeArena,
    tree: RTree<EdgeEnvelope>,
}

impl Debug for PlanarStorage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlanarStorage with Edges: {}", self.arena.len())
    }
}

impl PlanarStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn envelope(edge: &Edge) -> Option<AABB<Point>> {
        let rect = edge.geometry.line().bounding_rect()?;
        let (min, max) = (rect.min(), rect.max());

        Some(AABB::from_corners(
            Point::new(min.x - ENVELOPE_EPSILON, min.y - ENVELOPE_EPSILON),
            Point::new(max.x + ENVELOPE_EPSILON, max.y + ENVELOPE_EPSILON),
        ))
    }
}

impl Storage for PlanarStorage {
    fn srid(&self) -> Srid {
        Srid::Planar
    }

    fn add_edge(&mut self, edge: Edge) -> Result<(), SpatialError> {
        let envelope = PlanarStorage::envelope(&edge)
            .ok_or_else(|| SpatialError::Unindexable(edge.id, "empty geometry".to_string()))?;

        let index = self.arena.push(Srid::Planar, edge)?;
        self.tree.insert(EdgeEnvelope { index, envelope });

        Ok(())
    }

    fn get_edge(&self, id: EdgeId) -> Option<&Edge> {
        self.arena.get(id)
    }

    fn len(&self) -> usize {
        self.arena.len()
    }

    fn find_in_radius(&self, point: &GeoPoint, radius: f64) -> FxHashMap<EdgeId, f64> {
        if radius.is_infinite() {
            return (0..self.arena.len())
                .filter_map(|index| self.arena.distance(index, point))
                .collect();
        }

        let query = AABB::from_corners(
            Point::new(point.x() - radius, point.y() - radius),
            Point::new(point.x() + radius, point.y() + radius),
        );

        self.tree
            .locate_in_envelope_intersecting(&query)
            .filter_map(|envelope| self.arena.distance(envelope.index, point))
            .filter(|(_, distance)| *distance <= radius)
            .collect()
    }

    /// Walks the tree in order of bounding-box distance, keeping the best
    /// `n` exact distances, and stops once the next box is farther away
    /// than the `n`-th best edge.
    fn find_nearest(&self, point: &GeoPoint, n: usize) -> Vec<Neighbour> {
        if n == 0 {
            return vec![];
        }

        // Max-heap, so the worst retained neighbour is on top
        let mut best: BinaryHeap<Neighbour> = BinaryHeap::with_capacity(n + 1);

        let ordered = self
            .tree
            .nearest_neighbor_iter_with_distance_2(&point.point());

        for (envelope, box_distance_2) in ordered {
            if best.len() >= n {
                let worst = best
                    .peek()
                    .map(|worst| worst.distance)
                    .unwrap_or(f64::INFINITY);
                if box_distance_2 > worst * worst {
                    break;
                }
            }

            let Some((edge, distance)) = self.arena.distance(envelope.index, point) else {
                continue;
            };

            best.push(Neighbour { edge, distance });
            if best.len() > n {
                best.pop();
            }
        }

        best.into_sorted_vec()
    }
}
