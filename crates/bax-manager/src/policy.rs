//! Query policies: how the next batch of points is chosen.

use bax_types::{BaxResult, Domain, ExperimentError, Point};
use rand::RngCore;

use crate::config::Policy;
use crate::surrogate::Surrogate;

/// Runs a pre-configured inner-loop algorithm against an arbitrary
/// objective function and returns only the algorithm's output
/// candidates, best first.
pub trait AlgoExecutor {
    fn run_on(&mut self, f: &dyn Fn(&[f64]) -> f64) -> BaxResult<Vec<Point>>;
}

/// Select the next batch of query points.
pub fn next_batch(
    policy: Policy,
    batch_size: usize,
    surrogate: &dyn Surrogate,
    domain: &Domain,
    executor: &mut dyn AlgoExecutor,
    rng: &mut dyn RngCore,
    iteration: usize,
) -> BaxResult<Vec<Point>> {
    match policy {
        Policy::PosteriorSampling => {
            let mut batch = Vec::with_capacity(batch_size);
            for _ in 0..batch_size {
                let draw = surrogate.sample(rng);
                let output = executor.run_on(draw.as_ref())?;
                let best = output
                    .into_iter()
                    .next()
                    .ok_or(ExperimentError::EmptyBatch { iteration })?;
                batch.push(best);
            }
            Ok(batch)
        }
        Policy::Random => Ok((0..batch_size).map(|_| domain.sample(rng)).collect()),
    }
}
