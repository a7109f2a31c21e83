use crate::transition::RoadPosition;

#[doc(hidden)]
pub mod generator;

#[doc(inline)]
pub use generator::LayerGenerator;

/// The candidates of a single observation, and their costs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CandidateLayer {
    /// Index of the observation within the input.
    pub observation: usize,

    /// Candidates, nearest first.
    pub states: Vec<RoadPosition>,

    /// Emission log-probability of every state.
    pub emissions: Vec<f64>,

    /// Transition log-probabilities from every state of the
    /// previous layer, indexed `[from][to]`.
    ///
    /// Empty for the first layer of a sub-match.
    pub transitions: Vec<Vec<f64>>,
}

impl CandidateLayer {
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// The transition log-probability between two states, `-inf` if unknown.
    #[inline]
    pub fn transition(&self, from: usize, to: usize) -> f64 {
        self.transitions
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(f64::NEG_INFINITY)
    }
}
