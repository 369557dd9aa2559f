//! Objective-function abstraction.

use bax_types::{BaxResult, BenchError, Domain, Point};

/// A deterministic black-box objective over a bounded real domain.
pub trait Objective {
    /// Short identifier used in logs and result paths.
    fn name(&self) -> &str;

    /// Number of input dimensions.
    fn dim(&self) -> usize;

    /// The bounded domain the objective is defined on.
    fn domain(&self) -> &Domain;

    /// Evaluate the objective at a single point.
    fn evaluate(&self, x: &[f64]) -> BaxResult<f64>;

    /// Evaluate a batch of points, one value per point.
    fn evaluate_batch(&self, xs: &[Point]) -> BaxResult<Vec<f64>> {
        xs.iter().map(|x| self.evaluate(x)).collect()
    }

    /// Reject points whose dimension does not match the objective's.
    fn check_dim(&self, x: &[f64]) -> BaxResult<()> {
        if x.len() != self.dim() {
            return Err(BenchError::DimensionMismatch {
                expected: self.dim(),
                actual: x.len(),
            }
            .into());
        }
        Ok(())
    }
}

/// Sign-flip adapter: poses a minimization benchmark as a maximization
/// target by negating every evaluation.
#[derive(Debug, Clone)]
pub struct Negated<O> {
    inner: O,
    name: String,
}

impl<O: Objective> Negated<O> {
    pub fn new(inner: O) -> Self {
        let name = format!("neg_{}", inner.name());
        Self { inner, name }
    }

    /// The wrapped objective.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: Objective> Objective for Negated<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn domain(&self) -> &Domain {
        self.inner.domain()
    }

    fn evaluate(&self, x: &[f64]) -> BaxResult<f64> {
        Ok(-self.inner.evaluate(x)?)
    }
}
