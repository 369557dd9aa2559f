//! Performance metrics scored against the fitted surrogate.

use bax_bench::Objective;
use bax_types::{BaxResult, ExperimentError};

use crate::policy::AlgoExecutor;
use crate::surrogate::Surrogate;

/// Scores a trial's fitted surrogate against the true objective.
pub trait PerformanceMetric {
    /// Name used as the key in trial records.
    fn name(&self) -> &str;

    fn evaluate(
        &mut self,
        objective: &dyn Objective,
        surrogate: &dyn Surrogate,
    ) -> BaxResult<f64>;
}

/// The set of metrics recorded each iteration, keyed by [`PerformanceMetric::name`].
pub type MetricSet = Vec<Box<dyn PerformanceMetric>>;

/// Objective value at the maximizer of the posterior mean.
///
/// Maximizes the surrogate's posterior mean with the supplied inner-loop
/// executor, then evaluates the true objective at the maximizer.
pub struct ObjValAtMaxPostMean {
    executor: Box<dyn AlgoExecutor>,
}

impl ObjValAtMaxPostMean {
    pub const NAME: &'static str = "obj_val_at_max_post_mean";

    pub fn new(executor: Box<dyn AlgoExecutor>) -> Self {
        Self { executor }
    }
}

impl PerformanceMetric for ObjValAtMaxPostMean {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(
        &mut self,
        objective: &dyn Objective,
        surrogate: &dyn Surrogate,
    ) -> BaxResult<f64> {
        let output = self.executor.run_on(&|x: &[f64]| surrogate.mean(x))?;
        let maximizer = output.first().ok_or_else(|| ExperimentError::MetricFailed {
            metric: Self::NAME.to_string(),
            message: "executor produced no maximizer".to_string(),
        })?;
        objective.evaluate(maximizer)
    }
}
