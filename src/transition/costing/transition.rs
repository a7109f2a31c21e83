use crate::transition::costing::{log_exponential_distribution, Strategy};

/// Routes longer than this are considered implausible,
/// and cost exactly `-ROUTE_LENGTH_THRESHOLD`.
pub const ROUTE_LENGTH_THRESHOLD: f64 = 9_999_999_999.0;

/// What is known when costing the move between two candidates
/// of consecutive observations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionContext {
    /// Length of the route joining both candidates, infinite when unroutable.
    pub route_length: f64,

    /// Distance between both observations.
    pub linear_distance: f64,

    /// Seconds elapsed between both observations, never negative.
    pub time_delta: f64,
}

impl TransitionContext {
    /// The difference between the routed and the straight-line distance.
    ///
    /// Elapsed time does not scale the metric.
    #[inline]
    pub fn metric(&self) -> f64 {
        (self.linear_distance - self.route_length).abs()
    }
}

/// Exponential model of the deviation between route and straight-line lengths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExponentialTransition {
    pub beta: f64,
}

impl Strategy<TransitionContext> for ExponentialTransition {
    fn log_probability(&self, context: TransitionContext) -> f64 {
        if context.route_length.is_infinite() {
            return f64::NEG_INFINITY;
        }

        if context.route_length > ROUTE_LENGTH_THRESHOLD {
            return -ROUTE_LENGTH_THRESHOLD;
        }

        log_exponential_distribution(self.beta, context.metric())
    }
}
