use crate::geo::error::GeoError;
use crate::geo::EARTH_RADIUS;

use geo::{Distance, Euclidean};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};
use strum::{Display as StrumDisplay, EnumString};

/// Spatial reference identifier, tagging every [`GeoPoint`].
///
/// The tag decides which distance and projection rules apply.
/// `Wgs84` coordinates live on the unit sphere, `Planar` coordinates
/// are raw cartesian values where `z` is always zero.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, StrumDisplay, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Srid {
    /// Euclidean plane, `SRID=0`.
    Planar,
    /// Geodetic longitude and latitude in degrees, `SRID=4326`.
    #[default]
    Wgs84,
}

impl Srid {
    /// The numeric EPSG-style code of the reference system.
    pub const fn code(&self) -> u32 {
        match self {
            Srid::Planar => 0,
            Srid::Wgs84 => 4326,
        }
    }

    pub fn from_code(code: u32) -> Result<Self, GeoError> {
        match code {
            0 => Ok(Srid::Planar),
            4326 => Ok(Srid::Wgs84),
            other => Err(GeoError::UnsupportedSrid(other)),
        }
    }
}

/// A plain three-component vector.
///
/// Used for spherical math, where every geodetic point is
/// mapped onto the unit sphere.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(&self, other: &Vector3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn cross(&self, other: &Vector3) -> Vector3 {
        Vector3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    #[inline]
    pub fn norm2(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm2().sqrt()
    }

    #[inline]
    pub fn scale(&self, factor: f64) -> Vector3 {
        Vector3::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Returns the unit vector, or the zero vector if the input has no length.
    #[inline]
    pub fn normalize(&self) -> Vector3 {
        let norm = self.norm();
        if norm == 0.0 {
            return *self;
        }

        self.scale(1.0 / norm)
    }

    /// The angle, in radians, between two vectors.
    ///
    /// Uses `atan2(|a×b|, a·b)` which stays accurate
    /// for both tiny and near-antipodal angles.
    #[inline]
    pub fn angle(&self, other: &Vector3) -> f64 {
        self.cross(other).norm().atan2(self.dot(other))
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Self) -> Self::Output {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

/// A position tagged with its [`Srid`].
///
/// For `Wgs84` the `x` component is the longitude and `y` the latitude,
/// both in degrees. For `Planar`, `x` and `y` are raw cartesian values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    srid: Srid,
    point: geo::Point<f64>,
}

impl GeoPoint {
    /// Creates a new point, validating coordinates against the reference system.
    pub fn new(srid: Srid, x: f64, y: f64) -> Result<Self, GeoError> {
        if !x.is_finite() || !y.is_finite() {
            return Err(GeoError::InvalidCoordinate(x, y));
        }

        if srid == Srid::Wgs84 && (!(-180.0..=180.0).contains(&x) || !(-90.0..=90.0).contains(&y)) {
            return Err(GeoError::InvalidCoordinate(x, y));
        }

        Ok(Self {
            srid,
            point: geo::Point::new(x, y),
        })
    }

    /// A geodetic point, from longitude and latitude in degrees.
    pub fn wgs84(lon: f64, lat: f64) -> Result<Self, GeoError> {
        GeoPoint::new(Srid::Wgs84, lon, lat)
    }

    /// A cartesian point.
    pub fn planar(x: f64, y: f64) -> Result<Self, GeoError> {
        GeoPoint::new(Srid::Planar, x, y)
    }

    /// Wraps a [`geo::Point`] without validation.
    ///
    /// Used for points derived from already-validated geometry.
    pub(crate) const fn from_geo(srid: Srid, point: geo::Point<f64>) -> Self {
        Self { srid, point }
    }

    /// Recovers a geodetic point from a (not necessarily unit) vector.
    pub(crate) fn from_vector(vector: &Vector3) -> Self {
        let lat = vector.z.atan2((vector.x * vector.x + vector.y * vector.y).sqrt());
        let lon = vector.y.atan2(vector.x);

        Self::from_geo(
            Srid::Wgs84,
            geo::Point::new(lon.to_degrees(), lat.to_degrees()),
        )
    }

    #[inline]
    pub const fn srid(&self) -> Srid {
        self.srid
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.point.x()
    }

    #[inline]
    pub fn y(&self) -> f64 {
        self.point.y()
    }

    #[inline]
    pub const fn point(&self) -> geo::Point<f64> {
        self.point
    }

    /// The internal 3-vector of the point.
    ///
    /// Geodetic points are mapped onto the unit sphere,
    /// planar points keep their coordinates with `z = 0`.
    pub fn vector(&self) -> Vector3 {
        match self.srid {
            Srid::Planar => Vector3::new(self.x(), self.y(), 0.0),
            Srid::Wgs84 => {
                let (lon, lat) = (self.x().to_radians(), self.y().to_radians());
                Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
            }
        }
    }

    /// Distance to another point, in meters for geodetic points
    /// and in coordinate units for planar points.
    ///
    /// ### Note
    /// Mixing reference systems is not an error, the raw
    /// distance between both internal vectors is returned instead.
    pub fn distance(&self, other: &GeoPoint) -> f64 {
        match (self.srid, other.srid) {
            (Srid::Wgs84, Srid::Wgs84) => self.vector().angle(&other.vector()) * EARTH_RADIUS,
            (Srid::Planar, Srid::Planar) => Euclidean.distance(self.point, other.point),
            _ => (self.vector() - other.vector()).norm(),
        }
    }
}

impl Display for GeoPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "POINT({} {}) [{}]", self.x(), self.y(), self.srid)
    }
}

impl From<GeoPoint> for geo::Point<f64> {
    fn from(value: GeoPoint) -> Self {
        value.point
    }
}
