use crate::geo::Srid;
use crate::impl_err;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    #[error("invalid coordinate ({0}, {1})")]
    InvalidCoordinate(f64, f64),

    #[error("unsupported srid {0}, expected 0 (planar) or 4326 (wgs84)")]
    UnsupportedSrid(u32),

    #[error("polyline requires at least two points, given {0}")]
    DegeneratePolyline(usize),

    #[error("mixed reference systems in one geometry ({0} and {1})")]
    MixedSrid(Srid, Srid),
}

impl_err!(GeoError, Geo);
