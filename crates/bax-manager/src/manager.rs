//! The experiment manager: loops over trials and drives the query policy.

use bax_bench::Objective;
use bax_types::{config_error, BaxResult, Point};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ExperimentConfig;
use crate::metrics::PerformanceMetric;
use crate::policy::{self, AlgoExecutor};
use crate::storage;
use crate::surrogate::KernelSurrogate;
use crate::trial::{Observation, Trial};

/// Aggregate outcome of a [`run_experiment`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub id: Uuid,
    pub problem: String,
    pub trials: Vec<Trial>,
    /// Trials skipped because a completed record was already on disk.
    pub skipped: Vec<u32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl ExperimentSummary {
    /// Best observation across all trials, under maximization.
    pub fn best_observed(&self) -> Option<&Observation> {
        self.trials
            .iter()
            .filter_map(|trial| trial.best_observed())
            .max_by(|a, b| a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal))
    }
}

/// Run every trial in the configured range, sequentially.
///
/// Each trial seeds its own RNG stream from the trial index, runs the
/// initial design plus `num_iter` policy iterations, records every
/// metric per iteration, and is persisted to the experiment's results
/// directory before the next trial starts.
pub fn run_experiment(
    config: &ExperimentConfig,
    objective: &dyn Objective,
    executor: &mut dyn AlgoExecutor,
    metrics: &mut [Box<dyn PerformanceMetric>],
) -> BaxResult<ExperimentSummary> {
    config.validate()?;
    if objective.dim() != config.input_dim {
        return Err(config_error!(
            "objective dimension {} does not match configured input_dim {}",
            objective.dim(),
            config.input_dim
        ));
    }

    let results_dir = config.results_dir();
    let started_at = Utc::now();
    info!(
        problem = %config.problem,
        policy = config.policy.id(),
        first = config.first_trial,
        last = config.last_trial,
        "starting experiment"
    );

    let mut trials = Vec::new();
    let mut skipped = Vec::new();
    for trial_number in config.first_trial..=config.last_trial {
        if config.restart && storage::completed_trial_exists(&results_dir, trial_number) {
            warn!(trial = trial_number, "completed record found, skipping");
            skipped.push(trial_number);
            trials.push(storage::load_trial(&results_dir, trial_number)?);
            continue;
        }

        let mut trial = Trial::new(trial_number, trial_seed(trial_number));
        match run_trial(config, objective, executor, metrics, &mut trial) {
            Ok(()) => {
                trial.mark_completed();
                info!(
                    trial = trial_number,
                    observations = trial.observations.len(),
                    "trial completed"
                );
            }
            Err(error) => {
                trial.mark_failed(error.to_string());
                storage::save_trial(&results_dir, &trial)?;
                return Err(error);
            }
        }
        storage::save_trial(&results_dir, &trial)?;
        trials.push(trial);
    }

    Ok(ExperimentSummary {
        id: Uuid::new_v4(),
        problem: config.problem.clone(),
        trials,
        skipped,
        started_at,
        finished_at: Utc::now(),
    })
}

// Golden-ratio spread so neighboring trial indices map to distant seeds.
fn trial_seed(trial_number: u32) -> u64 {
    u64::from(trial_number).wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

fn run_trial(
    config: &ExperimentConfig,
    objective: &dyn Objective,
    executor: &mut dyn AlgoExecutor,
    metrics: &mut [Box<dyn PerformanceMetric>],
    trial: &mut Trial,
) -> BaxResult<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(trial.seed);
    trial.mark_running();
    info!(trial = trial.trial_number, seed = trial.seed, "trial started");

    for _ in 0..config.num_init_points {
        let x = objective.domain().sample(&mut rng);
        let y = observe(config, objective, &x, &mut rng)?;
        trial.record_observation(x, y, 0);
    }

    let lengthscale = KernelSurrogate::lengthscale_for(objective.domain());
    for iteration in 1..=config.num_iter {
        let surrogate = KernelSurrogate::fit(&trial.observations, lengthscale)?;
        let batch = policy::next_batch(
            config.policy,
            config.batch_size,
            &surrogate,
            objective.domain(),
            executor,
            &mut rng,
            iteration,
        )?;
        for x in batch {
            let y = observe(config, objective, &x, &mut rng)?;
            trial.record_observation(x, y, iteration);
        }

        // Metrics score the model state after this iteration's data.
        let surrogate = KernelSurrogate::fit(&trial.observations, lengthscale)?;
        for metric in metrics.iter_mut() {
            let value = metric.evaluate(objective, &surrogate)?;
            trial.record_metric(metric.name(), value);
            debug!(
                trial = trial.trial_number,
                iteration,
                metric = metric.name(),
                value,
                "metric recorded"
            );
        }

        if let Some(best) = trial.best_observed() {
            debug!(
                trial = trial.trial_number,
                iteration,
                best = best.y,
                "iteration complete"
            );
        }
    }

    Ok(())
}

fn observe(
    config: &ExperimentConfig,
    objective: &dyn Objective,
    x: &Point,
    rng: &mut ChaCha8Rng,
) -> BaxResult<f64> {
    let exact = objective.evaluate(x)?;
    Ok(config
        .noise_type
        .perturb(exact, config.noise_level, rng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::ObjValAtMaxPostMean;
    use bax_bench::{Hartmann6, Negated};
    use bax_types::Domain;
    use std::fs;
    use std::path::PathBuf;

    /// Coarse random-search maximizer used in place of the full inner loop.
    struct RandomSearchExecutor {
        domain: Domain,
        rng: ChaCha8Rng,
    }

    impl RandomSearchExecutor {
        fn new(domain: Domain) -> Self {
            Self {
                domain,
                rng: ChaCha8Rng::seed_from_u64(17),
            }
        }
    }

    impl AlgoExecutor for RandomSearchExecutor {
        fn run_on(&mut self, f: &dyn Fn(&[f64]) -> f64) -> BaxResult<Vec<Point>> {
            let mut scored: Vec<(f64, Point)> = (0..32)
                .map(|_| {
                    let x = self.domain.sample(&mut self.rng);
                    (f(&x), x)
                })
                .collect();
            scored.sort_by(|a, b| {
                b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal)
            });
            Ok(scored.into_iter().map(|(_, x)| x).collect())
        }
    }

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("bax-manager-test-{}", Uuid::new_v4()))
    }

    fn small_config(output_dir: &PathBuf) -> ExperimentConfig {
        ExperimentConfig::new("hartmann", 6)
            .with_init_points(4)
            .with_iterations(3)
            .with_trials(1, 2)
            .with_output_dir(output_dir.clone())
    }

    #[test]
    fn runs_every_trial_and_persists_records() {
        let dir = scratch_dir();
        let config = small_config(&dir);
        let objective = Negated::new(Hartmann6::new());
        let mut executor = RandomSearchExecutor::new(objective.domain().clone());
        let mut metrics: Vec<Box<dyn PerformanceMetric>> =
            vec![Box::new(ObjValAtMaxPostMean::new(Box::new(
                RandomSearchExecutor::new(objective.domain().clone()),
            )))];

        let summary =
            run_experiment(&config, &objective, &mut executor, &mut metrics).unwrap();

        assert_eq!(summary.trials.len(), 2);
        assert!(summary.skipped.is_empty());
        for trial in &summary.trials {
            // 4 init points + 3 iterations * batch 1
            assert_eq!(trial.observations.len(), 7);
            let recorded = &trial.metrics[ObjValAtMaxPostMean::NAME];
            assert_eq!(recorded.len(), 3);
            assert!(storage::completed_trial_exists(
                &config.results_dir(),
                trial.trial_number
            ));
        }
        assert!(summary.best_observed().is_some());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn restart_skips_completed_trials() {
        let dir = scratch_dir();
        let config = small_config(&dir);
        let objective = Negated::new(Hartmann6::new());
        let mut executor = RandomSearchExecutor::new(objective.domain().clone());
        let mut metrics: Vec<Box<dyn PerformanceMetric>> = Vec::new();

        run_experiment(&config, &objective, &mut executor, &mut metrics).unwrap();

        let rerun_config = config.clone().with_restart(true);
        let rerun =
            run_experiment(&rerun_config, &objective, &mut executor, &mut metrics).unwrap();
        assert_eq!(rerun.skipped, vec![1, 2]);
        assert_eq!(rerun.trials.len(), 2);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn trial_observations_are_reproducible_per_seed() {
        let dir_a = scratch_dir();
        let dir_b = scratch_dir();
        let objective = Negated::new(Hartmann6::new());
        let mut metrics: Vec<Box<dyn PerformanceMetric>> = Vec::new();

        let config_a = small_config(&dir_a).with_trials(3, 3);
        let mut executor_a = RandomSearchExecutor::new(objective.domain().clone());
        let summary_a =
            run_experiment(&config_a, &objective, &mut executor_a, &mut metrics).unwrap();

        let config_b = small_config(&dir_b).with_trials(3, 3);
        let mut executor_b = RandomSearchExecutor::new(objective.domain().clone());
        let summary_b =
            run_experiment(&config_b, &objective, &mut executor_b, &mut metrics).unwrap();

        assert_eq!(
            summary_a.trials[0].observations,
            summary_b.trials[0].observations
        );
        assert_eq!(summary_a.trials[0].seed, summary_b.trials[0].seed);

        fs::remove_dir_all(&dir_a).unwrap();
        fs::remove_dir_all(&dir_b).unwrap();
    }

    #[test]
    fn dimension_mismatch_is_rejected_up_front() {
        let dir = scratch_dir();
        let config = ExperimentConfig::new("hartmann", 4).with_output_dir(dir);
        let objective = Negated::new(Hartmann6::new());
        let mut executor = RandomSearchExecutor::new(objective.domain().clone());
        let mut metrics: Vec<Box<dyn PerformanceMetric>> = Vec::new();

        let result = run_experiment(&config, &objective, &mut executor, &mut metrics);
        assert!(result.is_err());
    }

    #[test]
    fn trial_seed_spreads_neighboring_indices() {
        let a = trial_seed(1);
        let b = trial_seed(2);
        assert_ne!(a, b);
        // High bits differ, not just the low ones.
        assert_ne!(a >> 32, b >> 32);
    }
}
