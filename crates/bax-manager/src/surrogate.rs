//! Posterior surrogates fitted on trial observations.

use bax_types::{BaxResult, Domain, ExperimentError, Point};
use rand::{Rng, RngCore};
use rand_distr::StandardNormal;

use crate::trial::Observation;

/// Kernel weights below this total are treated as "far from all data".
const MIN_TOTAL_WEIGHT: f64 = 1e-12;

/// A fitted probabilistic surrogate over the objective.
pub trait Surrogate {
    /// Posterior-mean prediction at `x`.
    fn mean(&self, x: &[f64]) -> f64;

    /// Draw an approximate posterior sample as a standalone function.
    fn sample(&self, rng: &mut dyn RngCore) -> Box<dyn Fn(&[f64]) -> f64>;
}

/// Gaussian-kernel regressor (Nadaraya–Watson) over the observations.
///
/// The posterior mean at `x` is the kernel-weighted average of observed
/// values; a posterior draw refits on values jittered by the
/// leave-one-out residual scale. A full Gaussian process would slot in
/// behind the [`Surrogate`] trait without touching the callers.
#[derive(Debug, Clone)]
pub struct KernelSurrogate {
    points: Vec<Point>,
    values: Vec<f64>,
    lengthscale: f64,
    residual_scale: f64,
}

impl KernelSurrogate {
    pub fn fit(observations: &[Observation], lengthscale: f64) -> BaxResult<Self> {
        if observations.is_empty() {
            return Err(ExperimentError::SurrogateUnfit {
                message: "no observations".to_string(),
            }
            .into());
        }
        if !lengthscale.is_finite() || lengthscale <= 0.0 {
            return Err(ExperimentError::SurrogateUnfit {
                message: format!("lengthscale must be positive and finite, got {lengthscale}"),
            }
            .into());
        }

        let points: Vec<Point> = observations.iter().map(|o| o.x.clone()).collect();
        let values: Vec<f64> = observations.iter().map(|o| o.y).collect();
        let mut surrogate = Self {
            points,
            values,
            lengthscale,
            residual_scale: 0.0,
        };
        surrogate.residual_scale = surrogate.loo_residual_scale();
        Ok(surrogate)
    }

    /// Default lengthscale for a domain: a tenth of its diagonal.
    pub fn lengthscale_for(domain: &Domain) -> f64 {
        0.1 * domain.diagonal()
    }

    pub fn residual_scale(&self) -> f64 {
        self.residual_scale
    }

    fn kernel(&self, squared_distance: f64) -> f64 {
        (-squared_distance / (2.0 * self.lengthscale * self.lengthscale)).exp()
    }

    fn prediction(&self, x: &[f64], skip: Option<usize>) -> f64 {
        let mut weight_total = 0.0;
        let mut weighted_sum = 0.0;
        for (index, (point, value)) in self.points.iter().zip(&self.values).enumerate() {
            if skip == Some(index) {
                continue;
            }
            let squared_distance: f64 = x
                .iter()
                .zip(point)
                .map(|(a, b)| (a - b).powi(2))
                .sum();
            let weight = self.kernel(squared_distance);
            weight_total += weight;
            weighted_sum += weight * value;
        }
        if weight_total > MIN_TOTAL_WEIGHT {
            weighted_sum / weight_total
        } else {
            self.global_mean(skip)
        }
    }

    fn global_mean(&self, skip: Option<usize>) -> f64 {
        let mut count = 0usize;
        let mut total = 0.0;
        for (index, value) in self.values.iter().enumerate() {
            if skip == Some(index) {
                continue;
            }
            count += 1;
            total += value;
        }
        if count == 0 {
            0.0
        } else {
            total / count as f64
        }
    }

    /// Leave-one-out residual root-mean-square; 0.0 with fewer than two
    /// observations.
    fn loo_residual_scale(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        let total: f64 = (0..n)
            .map(|index| {
                let predicted = self.prediction(&self.points[index], Some(index));
                (self.values[index] - predicted).powi(2)
            })
            .sum();
        (total / n as f64).sqrt()
    }

    fn value_spread(&self) -> f64 {
        let mean = self.global_mean(None);
        let n = self.values.len();
        if n < 2 {
            return 0.0;
        }
        let variance =
            self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64;
        variance.sqrt()
    }
}

impl Surrogate for KernelSurrogate {
    fn mean(&self, x: &[f64]) -> f64 {
        self.prediction(x, None)
    }

    fn sample(&self, rng: &mut dyn RngCore) -> Box<dyn Fn(&[f64]) -> f64> {
        // Residuals can vanish with few or widely separated observations;
        // a tenth of the value spread keeps some posterior variance.
        let jitter_scale = if self.residual_scale > 0.0 {
            self.residual_scale
        } else {
            0.1 * self.value_spread()
        };
        let jittered: Vec<f64> = self
            .values
            .iter()
            .map(|value| {
                let standard: f64 = rng.sample(StandardNormal);
                value + jitter_scale * standard
            })
            .collect();
        let drawn = Self {
            points: self.points.clone(),
            values: jittered,
            lengthscale: self.lengthscale,
            residual_scale: self.residual_scale,
        };
        Box::new(move |x| drawn.mean(x))
    }
}
