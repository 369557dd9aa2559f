//! Hartmann-6 experiment launcher.
//!
//! Wires the negated Hartmann-6 benchmark to the evolution-strategies
//! inner loop and the experiment manager, then runs an inclusive range
//! of independent trials.

use std::path::PathBuf;

use anyhow::Result;
use bax_algo::{EvolutionConfig, EvolutionStrategies, OptMode, SamplingStrategy};
use bax_bench::{Hartmann6, Negated, Objective};
use bax_manager::{
    default_init_points, run_experiment, AlgoExecutor, ExperimentConfig, MetricSet,
    ObjValAtMaxPostMean, Policy,
};
use bax_types::{BaxResult, Domain, NoiseType, Point};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Run Hartmann-6 Bayesian-optimization trials.
#[derive(Parser, Debug)]
#[command(name = "hartmann", version, about)]
struct Args {
    /// First trial to run (inclusive).
    first_trial: u32,

    /// Last trial to run (inclusive); defaults to FIRST_TRIAL.
    last_trial: Option<u32>,

    /// Root directory for result files.
    #[arg(short, long, value_name = "DIR", default_value = "results")]
    output_dir: PathBuf,
}

impl Args {
    fn trial_range(&self) -> (u32, u32) {
        match self.last_trial {
            Some(last) => (self.first_trial, last),
            None => (self.first_trial, self.first_trial),
        }
    }
}

/// Runs the evolution strategy on a function and keeps only the
/// algorithm output, discarding the generation history.
struct EsExecutor {
    es: EvolutionStrategies,
}

impl AlgoExecutor for EsExecutor {
    fn run_on(&mut self, f: &dyn Fn(&[f64]) -> f64) -> BaxResult<Vec<Point>> {
        let run = self.es.run_on(f)?;
        Ok(run.output)
    }
}

fn es_config(domain: Domain) -> EvolutionConfig {
    EvolutionConfig::new(domain)
        .with_generations(50)
        .with_population(10)
        .with_sampling(SamplingStrategy::Mutation)
        .with_mode(OptMode::Maximize)
        .with_init(vec![0.0; Hartmann6::DIM])
        .with_normal_scale(0.05)
        .with_keep_frac(0.3)
        .with_crop(false)
}

fn experiment_config(first_trial: u32, last_trial: u32, output_dir: PathBuf) -> ExperimentConfig {
    let input_dim = Hartmann6::DIM;
    ExperimentConfig::new("hartmann", input_dim)
        .with_noise(NoiseType::Noiseless, 0.0)
        .with_policy(Policy::PosteriorSampling)
        .with_batch_size(1)
        .with_init_points(default_init_points(input_dim))
        .with_iterations(100)
        .with_trials(first_trial, last_trial)
        .with_restart(false)
        .with_output_dir(output_dir)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let (first_trial, last_trial) = args.trial_range();

    let objective = Negated::new(Hartmann6::new());
    let mut executor = EsExecutor {
        es: EvolutionStrategies::new(es_config(objective.domain().clone()))?,
    };
    let metric_maximizer = EsExecutor {
        es: EvolutionStrategies::new(es_config(objective.domain().clone()))?,
    };
    let mut metrics: MetricSet =
        vec![Box::new(ObjValAtMaxPostMean::new(Box::new(metric_maximizer)))];

    let config = experiment_config(first_trial, last_trial, args.output_dir);
    let summary = run_experiment(&config, &objective, &mut executor, &mut metrics)?;

    if let Some(best) = summary.best_observed() {
        info!(best = best.y, trials = summary.trials.len(), "experiment finished");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_argument_means_a_single_trial() {
        let args = Args::try_parse_from(["hartmann", "5"]).unwrap();
        assert_eq!(args.trial_range(), (5, 5));
    }

    #[test]
    fn two_arguments_form_an_inclusive_range() {
        let args = Args::try_parse_from(["hartmann", "3", "7"]).unwrap();
        assert_eq!(args.trial_range(), (3, 7));
    }

    #[test]
    fn missing_or_malformed_arguments_are_rejected() {
        assert!(Args::try_parse_from(["hartmann"]).is_err());
        assert!(Args::try_parse_from(["hartmann", "three"]).is_err());
        assert!(Args::try_parse_from(["hartmann", "1", "2", "3"]).is_err());
    }

    #[test]
    fn fixed_configuration_values() {
        let config = experiment_config(3, 7, PathBuf::from("results"));
        assert_eq!(config.num_init_points, 14); // 2 * (6 + 1)
        assert_eq!(config.noise_level, 0.0);
        assert_eq!(config.noise_type, NoiseType::Noiseless);
        assert_eq!(config.policy, Policy::PosteriorSampling);
        assert_eq!(config.batch_size, 1);
        assert_eq!(config.num_iter, 100);
        assert!(!config.restart);
        assert_eq!((config.first_trial, config.last_trial), (3, 7));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn es_parameters_match_the_standard_setup() {
        let config = es_config(Domain::unit(Hartmann6::DIM));
        assert_eq!(config.n_generations, 50);
        assert_eq!(config.population_size, 10);
        assert_eq!(config.sampling, SamplingStrategy::Mutation);
        assert_eq!(config.mode, OptMode::Maximize);
        assert_eq!(config.init, vec![0.0; 6]);
        assert_eq!(config.normal_scale, 0.05);
        assert_eq!(config.keep_frac, 0.3);
        assert!(!config.crop);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn executor_returns_the_run_output_only() {
        let seeded = |seed| {
            es_config(Domain::unit(Hartmann6::DIM))
                .with_generations(5)
                .with_seed(seed)
        };
        let objective = Negated::new(Hartmann6::new());
        let f = |x: &[f64]| objective.evaluate(x).unwrap_or(f64::NEG_INFINITY);

        let mut direct = EvolutionStrategies::new(seeded(23)).unwrap();
        let expected = direct.run_on(&f).unwrap().output;

        let mut executor = EsExecutor {
            es: EvolutionStrategies::new(seeded(23)).unwrap(),
        };
        let output = executor.run_on(&f).unwrap();
        assert_eq!(output, expected);
    }
}
