use crate::geo::{GeoPoint, Srid};
use crate::transition::MatchError;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::io;

/// A single GPS fix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Observation {
    pub id: i64,
    pub time: DateTime<Utc>,
    pub point: GeoPoint,

    /// Reported horizontal accuracy, in meters.
    pub accuracy: Option<f64>,
}

impl Observation {
    pub fn new(id: i64, time: DateTime<Utc>, point: GeoPoint) -> Self {
        Self {
            id,
            time,
            point,
            accuracy: None,
        }
    }

    pub fn with_accuracy(self, accuracy: f64) -> Self {
        Self {
            accuracy: Some(accuracy),
            ..self
        }
    }

    /// Seconds elapsed since `earlier`, negative if this observation came first.
    #[inline]
    pub fn seconds_since(&self, earlier: &Observation) -> f64 {
        (self.time - earlier.time).num_milliseconds() as f64 / 1_000.0
    }
}

#[derive(Debug, Deserialize)]
struct ObservationRow {
    id: i64,
    time: DateTime<Utc>,
    x: f64,
    y: f64,
    accuracy: Option<f64>,
}

/// Parses a `;`-separated track with the header `id;time;x;y`, and an
/// optional `accuracy` column. Times are RFC 3339.
///
/// ```text
/// id;time;x;y;accuracy
/// 1;2024-05-01T10:00:00Z;37.6;55.7;4.5
/// ```
pub fn read_observations<R: io::Read>(reader: R, srid: Srid) -> Result<Vec<Observation>, MatchError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(reader);

    reader
        .deserialize::<ObservationRow>()
        .enumerate()
        .map(|(index, record)| {
            let row = index as u64 + 1;
            let record = record.map_err(|err| MatchError::InvalidObservation(row, err.to_string()))?;
            let point = GeoPoint::new(srid, record.x, record.y)
                .map_err(|err| MatchError::InvalidObservation(row, err.to_string()))?;

            let observation = Observation::new(record.id, record.time, point);
            Ok(match record.accuracy {
                Some(accuracy) => observation.with_accuracy(accuracy),
                None => observation,
            })
        })
        .collect()
}
