//! Observation-noise models.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Family of noise applied to objective observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoiseType {
    /// Observations are exact.
    Noiseless,
    /// Additive zero-mean Gaussian noise.
    Gaussian,
}

impl NoiseType {
    /// Identifier used in logs and result paths.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Noiseless => "noiseless",
            Self::Gaussian => "gaussian",
        }
    }

    /// Apply this noise model to an exact objective value.
    ///
    /// `level` is the standard deviation for the Gaussian family and is
    /// ignored when noiseless; non-positive levels leave the value exact.
    pub fn perturb<R: Rng + ?Sized>(&self, value: f64, level: f64, rng: &mut R) -> f64 {
        match self {
            Self::Noiseless => value,
            Self::Gaussian => {
                if level <= 0.0 {
                    return value;
                }
                let standard: f64 = rng.sample(StandardNormal);
                value + level * standard
            }
        }
    }
}

impl std::fmt::Display for NoiseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
