use crate::transition::costing::{log_normal_distribution, Strategy};

/// What is known when costing a single candidate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmissionContext {
    /// Distance from the observation to its projection upon the candidate edge.
    pub distance: f64,

    /// The accuracy reported alongside the observation, if any.
    pub accuracy: Option<f64>,
}

impl EmissionContext {
    pub fn new(distance: f64, accuracy: Option<f64>) -> Self {
        Self { distance, accuracy }
    }
}

/// Gaussian GPS error model.
///
/// A positive observation accuracy takes the place of `sigma`
/// for that observation alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussianEmission {
    pub sigma: f64,
}

impl Strategy<EmissionContext> for GaussianEmission {
    fn log_probability(&self, context: EmissionContext) -> f64 {
        let sigma = context
            .accuracy
            .filter(|accuracy| *accuracy > 0.0)
            .unwrap_or(self.sigma);

        log_normal_distribution(sigma, context.distance)
    }
}
