use crate::geo::error::GeoError;
use crate::geo::point::{GeoPoint, Srid, Vector3};
use crate::geo::EARTH_RADIUS;

use geo::{Closest, ClosestPoint, Coord, Line, LineString};
use itertools::Itertools;

/// The projection of a query point onto a [`Polyline`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projection {
    /// The closest position upon the polyline.
    pub point: GeoPoint,

    /// Arc-length from the first vertex to [`point`](#field.point),
    /// divided by the total length of the polyline. Always within `[0, 1]`.
    pub fraction: f64,

    /// Index of the vertex which closes the segment the projection falls on.
    pub next: usize,

    /// Distance from the query point to the projection.
    pub distance: f64,
}

/// An ordered sequence of at least two points sharing one [`Srid`].
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    srid: Srid,
    line: LineString<f64>,
}

impl Polyline {
    /// Creates a polyline, validating its coordinates and size.
    pub fn new(srid: Srid, line: LineString<f64>) -> Result<Self, GeoError> {
        if line.0.len() < 2 {
            return Err(GeoError::DegeneratePolyline(line.0.len()));
        }

        for coord in &line.0 {
            GeoPoint::new(srid, coord.x, coord.y)?;
        }

        Ok(Self { srid, line })
    }

    /// Creates a polyline from already-tagged points.
    pub fn from_points(points: &[GeoPoint]) -> Result<Self, GeoError> {
        let srid = points.first().map(GeoPoint::srid).unwrap_or_default();
        if let Some(other) = points.iter().find(|point| point.srid() != srid) {
            return Err(GeoError::MixedSrid(srid, other.srid()));
        }

        let line = points
            .iter()
            .map(|point| Coord {
                x: point.x(),
                y: point.y(),
            })
            .collect::<LineString<f64>>();

        Polyline::new(srid, line)
    }

    /// Internal constructor for slices of validated polylines.
    /// A single point is doubled so the result is still a line.
    fn from_coords(srid: Srid, mut coords: Vec<Coord<f64>>) -> Self {
        if coords.len() == 1 {
            coords.push(coords[0]);
        }

        Self {
            srid,
            line: LineString::new(coords),
        }
    }

    #[inline]
    pub const fn srid(&self) -> Srid {
        self.srid
    }

    #[inline]
    pub fn line(&self) -> &LineString<f64> {
        &self.line
    }

    /// Number of vertices in the polyline.
    #[inline]
    pub fn len(&self) -> usize {
        self.line.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.line.0.is_empty()
    }

    #[inline]
    pub fn point(&self, index: usize) -> Option<GeoPoint> {
        self.line
            .0
            .get(index)
            .map(|coord| GeoPoint::from_geo(self.srid, geo::Point(*coord)))
    }

    pub fn points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.line
            .0
            .iter()
            .map(|coord| GeoPoint::from_geo(self.srid, geo::Point(*coord)))
    }

    pub fn first(&self) -> Option<GeoPoint> {
        self.point(0)
    }

    pub fn last(&self) -> Option<GeoPoint> {
        self.len().checked_sub(1).and_then(|index| self.point(index))
    }

    /// Sum of segment lengths, on-sphere for geodetic polylines.
    pub fn length(&self) -> f64 {
        self.points()
            .tuple_windows()
            .map(|(a, b)| a.distance(&b))
            .sum()
    }

    /// Returns the polyline travelled in the opposite direction.
    pub fn reversed(&self) -> Polyline {
        let mut coords = self.line.0.clone();
        coords.reverse();

        Self::from_coords(self.srid, coords)
    }

    /// Projects `query` onto the polyline.
    ///
    /// Every segment is inspected, the closest is retained. Points
    /// beyond either end clamp to that end, giving a fraction of `0` or `1`.
    /// The query is interpreted in the reference system of the polyline.
    pub fn project(&self, query: &GeoPoint) -> Projection {
        let mut best: Option<(usize, GeoPoint, f64)> = None;

        for (index, (a, b)) in self.points().tuple_windows().enumerate() {
            let (projected, distance) = match self.srid {
                Srid::Wgs84 => project_spherical(&a, &b, query),
                Srid::Planar => project_planar(&a, &b, query),
            };

            if best.map_or(true, |(_, _, current)| distance < current) {
                best = Some((index, projected, distance));
            }
        }

        // A polyline always has a segment, the fallback only
        // guards against manually-built empty lines.
        let Some((segment, point, distance)) = best else {
            return Projection {
                point: *query,
                fraction: 0.0,
                next: 0,
                distance: 0.0,
            };
        };

        let total = self.length();
        let fraction = if total > 0.0 {
            let before = self
                .points()
                .take(segment + 1)
                .tuple_windows()
                .map(|(a, b)| a.distance(&b))
                .sum::<f64>();

            let into = self
                .point(segment)
                .map(|start| start.distance(&point))
                .unwrap_or_default();

            ((before + into) / total).clamp(0.0, 1.0)
        } else {
            0.0
        };

        // Landing on the end of the segment moves past that vertex
        let next = if self.point(segment + 1) == Some(point) {
            segment + 2
        } else {
            segment + 1
        };

        Projection {
            point,
            fraction,
            next,
            distance,
        }
    }

    /// The part of the polyline starting at the projected point.
    pub fn cut_from(&self, projection: &Projection) -> Polyline {
        self.slice(Some(projection), None)
    }

    /// The part of the polyline ending at the projected point.
    pub fn cut_to(&self, projection: &Projection) -> Polyline {
        self.slice(None, Some(projection))
    }

    /// The part of the polyline between two projections upon it.
    ///
    /// If `to` lies before `from`, the slice collapses onto `from`.
    pub fn slice(&self, from: Option<&Projection>, to: Option<&Projection>) -> Polyline {
        let coord = |projection: &Projection| Coord {
            x: projection.point.x(),
            y: projection.point.y(),
        };

        if let (Some(from), Some(to)) = (from, to) {
            if to.fraction < from.fraction {
                return Self::from_coords(self.srid, vec![coord(from)]);
            }
        }

        let start = from.map(|projection| projection.next).unwrap_or(0);
        let end = to
            .map(|projection| projection.next)
            .unwrap_or(self.len())
            .max(start);

        let mut coords = Vec::with_capacity(end - start + 2);
        coords.extend(from.map(coord));
        coords.extend_from_slice(&self.line.0[start.min(self.len())..end.min(self.len())]);
        coords.extend(to.map(coord));
        coords.dedup();

        Self::from_coords(self.srid, coords)
    }

    /// Appends another polyline, joining shared endpoints.
    pub fn extend(&mut self, other: &Polyline) {
        let skip = match (self.line.0.last(), other.line.0.first()) {
            (Some(a), Some(b)) if a == b => 1,
            _ => 0,
        };

        self.line.0.extend(other.line.0.iter().skip(skip));
    }
}

/// Closest point to `query` upon the great-circle arc `a → b`.
fn project_spherical(a: &GeoPoint, b: &GeoPoint, query: &GeoPoint) -> (GeoPoint, f64) {
    let (va, vb, vq) = (a.vector(), b.vector(), query.vector());
    let normal = va.cross(&vb);

    let closest_end = |va: Vector3, vb: Vector3| {
        if vq.angle(&va) <= vq.angle(&vb) {
            (*a, vq.angle(&va))
        } else {
            (*b, vq.angle(&vb))
        }
    };

    let (point, angle) = if normal.norm2() <= f64::EPSILON * f64::EPSILON {
        closest_end(va, vb)
    } else {
        // Drop the query onto the plane of the great circle
        let planar = vq - normal.scale(vq.dot(&normal) / normal.norm2());
        if planar.norm2() == 0.0 {
            closest_end(va, vb)
        } else {
            let candidate = planar.normalize();
            let inside =
                va.cross(&candidate).dot(&normal) >= 0.0 && candidate.cross(&vb).dot(&normal) >= 0.0;

            if inside {
                (GeoPoint::from_vector(&candidate), vq.angle(&candidate))
            } else {
                closest_end(va, vb)
            }
        }
    };

    (point, angle * EARTH_RADIUS)
}

/// Closest point to `query` upon the cartesian segment `a → b`.
fn project_planar(a: &GeoPoint, b: &GeoPoint, query: &GeoPoint) -> (GeoPoint, f64) {
    let line = Line::new(a.point().0, b.point().0);
    let point = match line.closest_point(&query.point()) {
        Closest::Intersection(point) | Closest::SinglePoint(point) => point,
        Closest::Indeterminate => a.point(),
    };

    let projected = GeoPoint::from_geo(Srid::Planar, point);
    let distance = projected.distance(&GeoPoint::from_geo(Srid::Planar, query.point()));
    (projected, distance)
}
