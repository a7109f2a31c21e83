use crate::geo::Srid;
use crate::graph::EdgeId;
use crate::impl_err;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    #[error("at least three observations are required, {0} were given")]
    MinimumObservations(usize),

    #[error("no observation has any candidate")]
    CandidatesNotFound,

    #[error("observation {0} is earlier than its predecessor")]
    TimeInversion(usize),

    #[error("observation {0} is in {1}, but the engine is in {2}")]
    SridMismatch(usize, Srid, Srid),

    #[error("invalid {0}: {1}")]
    InvalidParameter(&'static str, f64),

    #[error("no finite path reaches observation {0}")]
    Unsolvable(usize),

    #[error("decoded {found} states for {expected} observations")]
    PathLengthMismatch { expected: usize, found: usize },

    #[error("invalid observation on row {0}: {1}")]
    InvalidObservation(u64, String),

    #[error("edge {0} is not part of the engine")]
    UnknownEdge(EdgeId),
}

impl_err!(MatchError, Match);
