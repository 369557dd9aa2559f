//! Experiment configuration.

use bax_types::{config_error, BaxResult, ExperimentError, NoiseType};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Query policy used to pick the next batch of points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Policy {
    /// Posterior sampling: run the inner-loop algorithm on a posterior
    /// draw and query its output.
    #[serde(rename = "ps")]
    PosteriorSampling,
    /// Uniform-random queries; baseline.
    Random,
}

impl Policy {
    /// Identifier used in logs and result paths.
    pub fn id(&self) -> &'static str {
        match self {
            Self::PosteriorSampling => "ps",
            Self::Random => "random",
        }
    }
}

/// Default initial-design size: `2 × (dim + 1)`.
pub fn default_init_points(input_dim: usize) -> usize {
    2 * (input_dim + 1)
}

/// Top-level configuration for an experiment: one problem, one policy,
/// and an inclusive range of independent trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    /// Problem identifier used in logs and result paths.
    pub problem: String,

    /// Number of input dimensions of the objective.
    pub input_dim: usize,

    /// Observation-noise family.
    pub noise_type: NoiseType,

    /// Scale of the observation noise (standard deviation for Gaussian).
    pub noise_level: f64,

    /// Query policy.
    pub policy: Policy,

    /// Points queried per iteration.
    pub batch_size: usize,

    /// Size of the initial space-filling design.
    pub num_init_points: usize,

    /// Number of policy iterations after the initial design.
    pub num_iter: usize,

    /// First trial to run (inclusive).
    pub first_trial: u32,

    /// Last trial to run (inclusive).
    pub last_trial: u32,

    /// Skip trials whose completed results are already on disk.
    pub restart: bool,

    /// Root directory for result files.
    pub output_dir: PathBuf,
}

impl ExperimentConfig {
    pub fn new(problem: impl Into<String>, input_dim: usize) -> Self {
        Self {
            problem: problem.into(),
            input_dim,
            noise_type: NoiseType::Noiseless,
            noise_level: 0.0,
            policy: Policy::PosteriorSampling,
            batch_size: 1,
            num_init_points: default_init_points(input_dim),
            num_iter: 100,
            first_trial: 1,
            last_trial: 1,
            restart: false,
            output_dir: PathBuf::from("results"),
        }
    }

    pub fn with_noise(mut self, noise_type: NoiseType, noise_level: f64) -> Self {
        self.noise_type = noise_type;
        self.noise_level = noise_level;
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_init_points(mut self, num_init_points: usize) -> Self {
        self.num_init_points = num_init_points;
        self
    }

    pub fn with_iterations(mut self, num_iter: usize) -> Self {
        self.num_iter = num_iter;
        self
    }

    pub fn with_trials(mut self, first_trial: u32, last_trial: u32) -> Self {
        self.first_trial = first_trial;
        self.last_trial = last_trial;
        self
    }

    pub fn with_restart(mut self, restart: bool) -> Self {
        self.restart = restart;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn validate(&self) -> BaxResult<()> {
        if self.problem.is_empty() {
            return Err(config_error!("problem identifier must not be empty"));
        }
        if self.input_dim == 0 {
            return Err(config_error!("input_dim must be at least 1"));
        }
        if self.batch_size == 0 {
            return Err(config_error!("batch_size must be at least 1"));
        }
        if self.num_init_points == 0 {
            return Err(config_error!("num_init_points must be at least 1"));
        }
        if self.num_iter == 0 {
            return Err(config_error!("num_iter must be at least 1"));
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(config_error!(
                "noise_level must be finite and non-negative, got {}",
                self.noise_level
            ));
        }
        if self.noise_type == NoiseType::Noiseless && self.noise_level != 0.0 {
            return Err(config_error!(
                "noiseless experiments require noise_level = 0.0, got {}",
                self.noise_level
            ));
        }
        if self.first_trial > self.last_trial {
            return Err(ExperimentError::InvalidTrialRange {
                first: self.first_trial,
                last: self.last_trial,
            }
            .into());
        }
        Ok(())
    }

    /// Directory holding this experiment's trial records.
    pub fn results_dir(&self) -> PathBuf {
        self.output_dir
            .join(&self.problem)
            .join(format!("{}_q{}", self.policy.id(), self.batch_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hartmann_config() -> ExperimentConfig {
        ExperimentConfig::new("hartmann", 6)
    }

    #[test]
    fn defaults_match_the_standard_setup() {
        let config = hartmann_config();
        assert_eq!(config.num_init_points, 14); // 2 * (6 + 1)
        assert_eq!(config.noise_level, 0.0);
        assert_eq!(config.noise_type, NoiseType::Noiseless);
        assert_eq!(config.batch_size, 1);
        assert!(!config.restart);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_init_points_formula() {
        assert_eq!(default_init_points(6), 14);
        assert_eq!(default_init_points(1), 4);
        assert_eq!(default_init_points(10), 22);
    }

    #[test]
    fn trial_range_must_be_ordered() {
        let config = hartmann_config().with_trials(7, 3);
        assert!(config.validate().is_err());

        let single = hartmann_config().with_trials(5, 5);
        assert!(single.validate().is_ok());
    }

    #[test]
    fn rejects_zero_sized_settings() {
        assert!(hartmann_config().with_batch_size(0).validate().is_err());
        assert!(hartmann_config().with_init_points(0).validate().is_err());
        assert!(hartmann_config().with_iterations(0).validate().is_err());
        assert!(ExperimentConfig::new("", 6).validate().is_err());
        assert!(ExperimentConfig::new("hartmann", 0).validate().is_err());
    }

    #[test]
    fn noiseless_requires_zero_level() {
        let config = hartmann_config().with_noise(NoiseType::Noiseless, 0.1);
        assert!(config.validate().is_err());

        let gaussian = hartmann_config().with_noise(NoiseType::Gaussian, 0.1);
        assert!(gaussian.validate().is_ok());
    }

    #[test]
    fn results_dir_encodes_problem_policy_and_batch() {
        let config = hartmann_config().with_output_dir("out");
        let dir = config.results_dir();
        assert_eq!(dir, PathBuf::from("out/hartmann/ps_q1"));
    }

    #[test]
    fn policy_serde_identifiers() {
        let json = serde_json::to_string(&Policy::PosteriorSampling).unwrap();
        assert_eq!(json, "\"ps\"");
        let back: Policy = serde_json::from_str("\"random\"").unwrap();
        assert_eq!(back, Policy::Random);
    }
}
