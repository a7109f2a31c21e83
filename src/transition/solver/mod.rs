#[doc(hidden)]
pub mod viterbi;

#[doc(inline)]
pub use viterbi::*;

use crate::transition::{CandidateLayer, MatchError};

/// The most likely sequence of states through a sub-match.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViterbiPath {
    /// Index of the chosen state within each layer.
    pub states: Vec<usize>,

    /// Accumulated log-probability of the sequence.
    pub probability: f64,
}

/// Defines a structure which decodes a connected run of
/// [`CandidateLayer`]s into its most likely state sequence.
///
/// Every layer after the first must carry its transitions from
/// the previous layer, and at least one finite path must exist.
pub trait Solver {
    fn solve(&self, layers: &[CandidateLayer]) -> Result<ViterbiPath, MatchError>;
}
