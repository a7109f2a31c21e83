//! Costing of the hidden markov model, in natural-log space.
//!
//! The matcher scores candidates through the aggregate [`CostingStrategies`],
//! holding one [`Strategy`] per heuristic:
//!
//! - [`EmissionStrategy`], the likelihood of an observation given a
//!   candidate position, see [`EmissionContext`].
//! - [`TransitionStrategy`], the likelihood of moving between two
//!   candidates of consecutive observations, see [`TransitionContext`].
//!
//! The defaults, [`GaussianEmission`] and [`ExponentialTransition`], are
//! built from [`HmmParameters`]:
//!
//! ```rust
//! use horizon::config::HmmParameters;
//! use horizon::transition::{CostingStrategies, EmissionContext};
//!
//! let costing = CostingStrategies::from_parameters(HmmParameters::new(50.0, 2.0).unwrap());
//! let near = costing.emission(EmissionContext::new(1.0, None));
//! let far = costing.emission(EmissionContext::new(30.0, None));
//! assert!(near > far);
//! ```
//!
//! Custom heuristics only need to implement [`Strategy`] for the relevant context.
//!
//! ```rust
//! use horizon::transition::{Strategy, TransitionContext};
//!
//! /// Ignores the route entirely.
//! struct Indifferent;
//!
//! impl Strategy<TransitionContext> for Indifferent {
//!     fn log_probability(&self, _: TransitionContext) -> f64 {
//!         0.0
//!     }
//! }
//! ```

use crate::config::HmmParameters;

#[doc(hidden)]
pub mod distribution;
#[doc(hidden)]
pub mod emission;
#[doc(hidden)]
pub mod transition;

#[doc(inline)]
pub use distribution::*;
#[doc(inline)]
pub use emission::*;
#[doc(inline)]
pub use transition::*;

pub trait Strategy<Ctx> {
    /// The natural logarithm of the probability of the context.
    ///
    /// `f64::NEG_INFINITY` marks an impossible context.
    fn log_probability(&self, context: Ctx) -> f64;
}

pub trait EmissionStrategy: Strategy<EmissionContext> + Send + Sync {}
impl<T> EmissionStrategy for T where T: Strategy<EmissionContext> + Send + Sync {}

pub trait TransitionStrategy: Strategy<TransitionContext> + Send + Sync {}
impl<T> TransitionStrategy for T where T: Strategy<TransitionContext> + Send + Sync {}

pub struct CostingStrategies<E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    emission: E,
    transition: T,
}

impl<E, T> CostingStrategies<E, T>
where
    E: EmissionStrategy,
    T: TransitionStrategy,
{
    pub fn new(emission: E, transition: T) -> Self {
        Self {
            emission,
            transition,
        }
    }

    #[inline(always)]
    pub fn emission(&self, context: EmissionContext) -> f64 {
        self.emission.log_probability(context)
    }

    #[inline(always)]
    pub fn transition(&self, context: TransitionContext) -> f64 {
        self.transition.log_probability(context)
    }
}

impl CostingStrategies<GaussianEmission, ExponentialTransition> {
    pub fn from_parameters(parameters: HmmParameters) -> Self {
        CostingStrategies::new(
            GaussianEmission {
                sigma: parameters.sigma,
            },
            ExponentialTransition {
                beta: parameters.beta,
            },
        )
    }
}

impl Default for CostingStrategies<GaussianEmission, ExponentialTransition> {
    fn default() -> Self {
        CostingStrategies::from_parameters(HmmParameters::default())
    }
}
