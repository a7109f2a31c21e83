//! Geometry primitives tagged by their spatial reference system.
//!
//! A [`GeoPoint`] is either geodetic ([`Srid::Wgs84`]), where all
//! distances are arcs upon a sphere of radius [`EARTH_RADIUS`], or
//! planar ([`Srid::Planar`]), where distances are Euclidean.
//!
//! ```rust
//! use horizon::geo::{GeoPoint, Polyline, Srid};
//! use geo::wkt;
//!
//! let line = Polyline::new(Srid::Planar, wkt! { LINESTRING(0. 0., 10. 0.) }).unwrap();
//! let projection = line.project(&GeoPoint::planar(5.0, 3.0).unwrap());
//!
//! assert_eq!(projection.fraction, 0.5);
//! assert_eq!(projection.distance, 3.0);
//! ```

/// Earth radius, in meters, used for all geodetic distances.
pub const EARTH_RADIUS: f64 = 6_370_986.884_258_304;

#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod point;
#[doc(hidden)]
pub mod polyline;


#[doc(inline)]
pub use error::GeoError;
#[doc(inline)]
pub use point::{GeoPoint, Srid, Vector3};
#[doc(inline)]
pub use polyline::{Polyline, Projection};
