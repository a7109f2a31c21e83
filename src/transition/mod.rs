//! Hidden markov model map-matching.
//!
//! A trip of [`Observation`]s is matched onto the graph of a
//! [`MapEngine`](crate::graph::MapEngine) by the [`MapMatcher`]:
//!
//! 1. The [`LayerGenerator`] gives every observation a
//!    [`CandidateLayer`] of [`RoadPosition`]s on nearby edges.
//! 2. Consecutive layers are joined through the [`RouteCache`],
//!    each pair of candidates costed by the [`CostingStrategies`].
//! 3. Each connected run of layers is decoded by a [`Solver`],
//!    and assembled into a [`SubMatch`] of the [`MatchResult`].

pub mod cache;
pub mod candidate;
pub mod costing;
pub mod error;
pub mod layer;
pub mod matcher;
pub mod observation;
pub mod result;
pub mod solver;

#[cfg(test)]
mod test;

// Re-Exports
#[doc(inline)]
pub use cache::*;
#[doc(inline)]
pub use candidate::*;
#[doc(inline)]
pub use costing::*;
#[doc(inline)]
pub use error::*;
#[doc(inline)]
pub use solver::*;

pub use layer::*;
pub use matcher::*;
pub use observation::*;
pub use result::*;
