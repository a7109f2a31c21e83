use crate::transition::{CandidateLayer, MatchError, Solver, ViterbiPath};

use log::trace;

/// Max-sum Viterbi decoding in log space.
///
/// A first-layer state scores twice its emission, as its start
/// probability is its emission. Each later state takes the best
/// predecessor, keeping the earliest on ties, plus its own emission.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaxPlusViterbi;

impl Solver for MaxPlusViterbi {
    fn solve(&self, layers: &[CandidateLayer]) -> Result<ViterbiPath, MatchError> {
        let Some(first) = layers.first() else {
            return Ok(ViterbiPath::default());
        };

        let mut scores = first
            .emissions
            .iter()
            .map(|emission| emission + emission)
            .collect::<Vec<_>>();

        let mut back_pointers: Vec<Vec<Option<usize>>> = Vec::with_capacity(layers.len());

        for layer in &layers[1..] {
            let (next, pointers): (Vec<_>, Vec<_>) = layer
                .emissions
                .iter()
                .enumerate()
                .map(|(to, emission)| {
                    let (best, parent) = scores.iter().enumerate().fold(
                        (f64::NEG_INFINITY, None),
                        |(best, parent), (from, score)| {
                            let candidate = score + layer.transition(from, to);
                            if candidate > best {
                                (candidate, Some(from))
                            } else {
                                (best, parent)
                            }
                        },
                    );

                    (best + emission, parent)
                })
                .unzip();

            scores = next;
            back_pointers.push(pointers);
        }

        let (last, probability) = scores.iter().enumerate().fold(
            (None, f64::NEG_INFINITY),
            |(state, best), (index, score)| {
                if *score > best {
                    (Some(index), *score)
                } else {
                    (state, best)
                }
            },
        );

        let mut state = last.ok_or(MatchError::Unsolvable(
            layers.last().map_or(first.observation, |layer| layer.observation),
        ))?;

        let mut states = Vec::with_capacity(layers.len());
        states.push(state);

        for (pointers, layer) in back_pointers.iter().zip(&layers[1..]).rev() {
            state = pointers
                .get(state)
                .copied()
                .flatten()
                .ok_or(MatchError::Unsolvable(layer.observation))?;
            states.push(state);
        }

        states.reverse();
        trace!("Decoded {} states at {probability}", states.len());

        if states.len() != layers.len() {
            return Err(MatchError::PathLengthMismatch {
                expected: layers.len(),
                found: states.len(),
            });
        }

        Ok(ViterbiPath {
            states,
            probability,
        })
    }
}
