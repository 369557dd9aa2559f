//! Hartmann synthetic benchmark.

use bax_types::{BaxResult, BenchError, Domain, Point};

use crate::Objective;

const A: [[f64; 6]; 4] = [
    [10.0, 3.0, 17.0, 3.5, 1.7, 8.0],
    [0.05, 10.0, 17.0, 0.1, 8.0, 14.0],
    [3.0, 3.5, 1.7, 10.0, 17.0, 8.0],
    [17.0, 8.0, 0.05, 10.0, 0.1, 14.0],
];

const C: [f64; 4] = [1.0, 1.2, 3.0, 3.2];

const P: [[f64; 6]; 4] = [
    [0.1312, 0.1696, 0.5569, 0.0124, 0.8283, 0.5886],
    [0.2329, 0.4135, 0.8307, 0.3736, 0.1004, 0.9991],
    [0.2348, 0.1451, 0.3522, 0.2883, 0.3047, 0.6650],
    [0.4047, 0.8828, 0.8732, 0.5743, 0.1091, 0.0381],
];

/// The 6-dimensional Hartmann function on `[0, 1]^6`.
///
/// Multimodal with six local minima; the global minimum is −3.32237 at
/// (0.20169, 0.150011, 0.476874, 0.275332, 0.311652, 0.6573).
#[derive(Debug, Clone)]
pub struct Hartmann6 {
    domain: Domain,
}

impl Hartmann6 {
    pub const DIM: usize = 6;

    pub fn new() -> Self {
        Self {
            domain: Domain::unit(Self::DIM),
        }
    }

    /// Published global minimizer and minimum value.
    pub fn global_minimum() -> (Point, f64) {
        (
            vec![0.20169, 0.150011, 0.476874, 0.275332, 0.311652, 0.6573],
            -3.32237,
        )
    }
}

impl Default for Hartmann6 {
    fn default() -> Self {
        Self::new()
    }
}

impl Objective for Hartmann6 {
    fn name(&self) -> &str {
        "hartmann"
    }

    fn dim(&self) -> usize {
        Self::DIM
    }

    fn domain(&self) -> &Domain {
        &self.domain
    }

    fn evaluate(&self, x: &[f64]) -> BaxResult<f64> {
        self.check_dim(x)?;

        let value = -C
            .iter()
            .enumerate()
            .map(|(i, &ci)| {
                let exponent: f64 = A[i]
                    .iter()
                    .zip(P[i].iter())
                    .zip(x)
                    .map(|((&aij, &pij), &xj)| aij * (xj - pij).powi(2))
                    .sum();
                ci * (-exponent).exp()
            })
            .sum::<f64>();

        if !value.is_finite() {
            return Err(BenchError::NonFiniteValue.into());
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn value_at_global_minimum() {
        let objective = Hartmann6::new();
        let (minimizer, minimum) = Hartmann6::global_minimum();
        let value = objective.evaluate(&minimizer).unwrap();
        assert!(
            (value - minimum).abs() < 1e-4,
            "expected {minimum}, got {value}"
        );
    }

    #[test]
    fn negative_everywhere_on_the_domain() {
        let objective = Hartmann6::new();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        for _ in 0..200 {
            let x = objective.domain().sample(&mut rng);
            let value = objective.evaluate(&x).unwrap();
            assert!(value < 0.0, "Hartmann-6 must be negative on [0,1]^6, got {value}");
            assert!(value > -3.4, "value below the global minimum: {value}");
        }
    }

    #[test]
    fn no_other_sample_beats_the_minimizer() {
        let objective = Hartmann6::new();
        let (minimizer, _) = Hartmann6::global_minimum();
        let at_minimizer = objective.evaluate(&minimizer).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        for _ in 0..500 {
            let x = objective.domain().sample(&mut rng);
            assert!(objective.evaluate(&x).unwrap() >= at_minimizer);
        }
    }

    #[test]
    fn rejects_wrong_dimension() {
        let objective = Hartmann6::new();
        assert!(objective.evaluate(&[0.5; 5]).is_err());
        assert!(objective.evaluate(&[]).is_err());
    }
}
