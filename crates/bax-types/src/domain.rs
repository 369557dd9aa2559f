//! Bounded real search domains.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{validation_error, BaxResult};

/// A point in the search space, one coordinate per dimension.
pub type Point = Vec<f64>;

/// Per-dimension closed bounds of a search space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    bounds: Vec<(f64, f64)>,
}

impl Domain {
    /// Build a domain from explicit `(low, high)` bounds per dimension.
    pub fn new(bounds: Vec<(f64, f64)>) -> BaxResult<Self> {
        if bounds.is_empty() {
            return Err(validation_error!("domain must have at least one dimension"));
        }
        for (index, (low, high)) in bounds.iter().enumerate() {
            if !low.is_finite() || !high.is_finite() || low >= high {
                return Err(validation_error!(
                    "invalid bounds for dimension {}: [{}, {}]",
                    index,
                    low,
                    high
                ));
            }
        }
        Ok(Self { bounds })
    }

    /// The unit hypercube `[0, 1]^dim`.
    pub fn unit(dim: usize) -> Self {
        Self {
            bounds: vec![(0.0, 1.0); dim],
        }
    }

    /// Number of dimensions.
    pub fn dim(&self) -> usize {
        self.bounds.len()
    }

    /// Per-dimension bounds.
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Whether every coordinate of `point` lies within its bounds.
    pub fn contains(&self, point: &[f64]) -> bool {
        point.len() == self.bounds.len()
            && point
                .iter()
                .zip(&self.bounds)
                .all(|(value, (low, high))| *value >= *low && *value <= *high)
    }

    /// Clamp every coordinate of `point` into its bounds, in place.
    pub fn clamp(&self, point: &mut Point) {
        for (value, (low, high)) in point.iter_mut().zip(&self.bounds) {
            *value = value.clamp(*low, *high);
        }
    }

    /// Sample a uniform point from the domain.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        self.bounds
            .iter()
            .map(|(low, high)| rng.gen_range(*low..=*high))
            .collect()
    }

    /// Midpoint of the domain.
    pub fn center(&self) -> Point {
        self.bounds
            .iter()
            .map(|(low, high)| 0.5 * (low + high))
            .collect()
    }

    /// Euclidean length of the domain diagonal.
    pub fn diagonal(&self) -> f64 {
        self.bounds
            .iter()
            .map(|(low, high)| (high - low).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn unit_domain_shape() {
        let domain = Domain::unit(6);
        assert_eq!(domain.dim(), 6);
        assert!(domain.bounds().iter().all(|b| *b == (0.0, 1.0)));
        assert_eq!(domain.center(), vec![0.5; 6]);
    }

    #[test]
    fn new_rejects_degenerate_bounds() {
        assert!(Domain::new(vec![]).is_err());
        assert!(Domain::new(vec![(1.0, 1.0)]).is_err());
        assert!(Domain::new(vec![(2.0, -1.0)]).is_err());
        assert!(Domain::new(vec![(0.0, f64::INFINITY)]).is_err());
    }

    #[test]
    fn contains_and_clamp() {
        let domain = Domain::unit(3);
        assert!(domain.contains(&[0.0, 0.5, 1.0]));
        assert!(!domain.contains(&[0.0, 0.5, 1.5]));
        assert!(!domain.contains(&[0.0, 0.5])); // wrong dimension

        let mut point = vec![-0.2, 0.5, 1.8];
        domain.clamp(&mut point);
        assert_eq!(point, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn sample_respects_bounds() {
        let domain = Domain::new(vec![(-2.0, -1.0), (10.0, 20.0)]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            let point = domain.sample(&mut rng);
            assert!(domain.contains(&point), "sampled point out of bounds: {point:?}");
        }
    }

    #[test]
    fn diagonal_of_unit_cube() {
        let domain = Domain::unit(4);
        assert!((domain.diagonal() - 2.0).abs() < 1e-12);
    }
}
