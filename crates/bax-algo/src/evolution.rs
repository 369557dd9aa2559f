//! Evolution-strategies optimizer.

use bax_types::{AlgoError, BaxResult, Domain, Point};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::debug;

/// Whether the strategy maximizes or minimizes the objective it is run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptMode {
    Maximize,
    Minimize,
}

impl Default for OptMode {
    fn default() -> Self {
        Self::Maximize
    }
}

/// How new candidates are produced from the surviving parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Gaussian mutation of a parent.
    Mutation,
    /// Arithmetic blend of two parents followed by Gaussian mutation.
    Recombination,
}

/// Typed configuration for an evolution-strategies run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Number of generations to evolve.
    pub n_generations: usize,

    /// Candidates evaluated per generation.
    pub population_size: usize,

    /// Candidate sampling scheme.
    pub sampling: SamplingStrategy,

    /// Optimization direction.
    pub mode: OptMode,

    /// Point the first generation is spread around.
    pub init: Point,

    /// The search domain.
    pub domain: Domain,

    /// Standard deviation of Gaussian mutations.
    pub normal_scale: f64,

    /// Fraction of the population kept as survivors each generation.
    pub keep_frac: f64,

    /// Clamp mutated candidates into the domain.
    pub crop: bool,

    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl EvolutionConfig {
    pub fn new(domain: Domain) -> Self {
        let init = domain.center();
        Self {
            n_generations: 50,
            population_size: 10,
            sampling: SamplingStrategy::Mutation,
            mode: OptMode::default(),
            init,
            domain,
            normal_scale: 0.05,
            keep_frac: 0.3,
            crop: false,
            seed: None,
        }
    }

    pub fn with_generations(mut self, n: usize) -> Self {
        self.n_generations = n;
        self
    }

    pub fn with_population(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    pub fn with_sampling(mut self, sampling: SamplingStrategy) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_mode(mut self, mode: OptMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_init(mut self, init: Point) -> Self {
        self.init = init;
        self
    }

    pub fn with_normal_scale(mut self, scale: f64) -> Self {
        self.normal_scale = scale;
        self
    }

    pub fn with_keep_frac(mut self, frac: f64) -> Self {
        self.keep_frac = frac;
        self
    }

    pub fn with_crop(mut self, crop: bool) -> Self {
        self.crop = crop;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> BaxResult<()> {
        if self.n_generations == 0 {
            return Err(invalid_parameter("n_generations", "must be at least 1"));
        }
        if self.population_size == 0 {
            return Err(invalid_parameter("population_size", "must be at least 1"));
        }
        if !self.normal_scale.is_finite() || self.normal_scale <= 0.0 {
            return Err(invalid_parameter("normal_scale", "must be positive and finite"));
        }
        if !self.keep_frac.is_finite() || self.keep_frac <= 0.0 || self.keep_frac > 1.0 {
            return Err(invalid_parameter("keep_frac", "must lie in (0, 1]"));
        }
        if self.init.len() != self.domain.dim() {
            return Err(AlgoError::InitDimensionMismatch {
                expected: self.domain.dim(),
                actual: self.init.len(),
            }
            .into());
        }
        Ok(())
    }

    /// Survivors kept after selection each generation.
    pub fn n_keep(&self) -> usize {
        ((self.population_size as f64 * self.keep_frac).ceil() as usize).max(1)
    }
}

fn invalid_parameter(parameter: &str, message: &str) -> bax_types::BaxError {
    AlgoError::InvalidParameter {
        parameter: parameter.to_string(),
        message: message.to_string(),
    }
    .into()
}

/// One generation's summary in the run history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best_value: f64,
    pub mean_value: f64,
    pub best_point: Point,
}

/// Outcome of a full evolution-strategies run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EsRun {
    /// Per-generation progress, oldest first.
    pub history: Vec<GenerationRecord>,

    /// Surviving candidates of the final generation, best first.
    pub output: Vec<Point>,
}

impl EsRun {
    /// Best candidate of the final generation.
    pub fn best(&self) -> Option<&Point> {
        self.output.first()
    }
}

/// Population-based, mutation-driven black-box optimizer.
///
/// Parameters are fixed at construction; only the RNG stream advances
/// across repeated runs.
pub struct EvolutionStrategies {
    config: EvolutionConfig,
    rng: ChaCha8Rng,
}

impl EvolutionStrategies {
    pub fn new(config: EvolutionConfig) -> BaxResult<Self> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run the configured strategy against `f`.
    pub fn run_on(&mut self, f: &dyn Fn(&[f64]) -> f64) -> BaxResult<EsRun> {
        let n_generations = self.config.n_generations;
        let n_keep = self.config.n_keep();
        let mode = self.config.mode;

        let mut survivors: Vec<Point> = vec![self.config.init.clone()];
        let mut history = Vec::with_capacity(n_generations);

        for generation in 0..n_generations {
            let population = self.next_population(&survivors);
            let mut scored: Vec<(f64, Point)> =
                population.into_iter().map(|x| (f(&x), x)).collect();
            scored.sort_by(|a, b| {
                let ord = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
                match mode {
                    OptMode::Maximize => ord.reverse(),
                    OptMode::Minimize => ord,
                }
            });

            let mean_value =
                scored.iter().map(|(value, _)| value).sum::<f64>() / scored.len() as f64;
            history.push(GenerationRecord {
                generation,
                best_value: scored[0].0,
                mean_value,
                best_point: scored[0].1.clone(),
            });
            debug!(generation, best = scored[0].0, mean = mean_value, "generation complete");

            survivors = scored
                .into_iter()
                .take(n_keep)
                .map(|(_, point)| point)
                .collect();
        }

        Ok(EsRun {
            history,
            output: survivors,
        })
    }

    fn next_population(&mut self, survivors: &[Point]) -> Vec<Point> {
        let config = &self.config;
        let rng = &mut self.rng;
        (0..config.population_size)
            .map(|index| {
                let parent = &survivors[index % survivors.len()];
                let mut child: Point = match config.sampling {
                    SamplingStrategy::Mutation => parent
                        .iter()
                        .map(|value| {
                            let standard: f64 = rng.sample(StandardNormal);
                            value + config.normal_scale * standard
                        })
                        .collect(),
                    SamplingStrategy::Recombination => {
                        let other = &survivors[rng.gen_range(0..survivors.len())];
                        parent
                            .iter()
                            .zip(other)
                            .map(|(a, b)| {
                                let weight: f64 = rng.gen();
                                let standard: f64 = rng.sample(StandardNormal);
                                weight * a + (1.0 - weight) * b + config.normal_scale * standard
                            })
                            .collect()
                    }
                };
                if config.crop {
                    config.domain.clamp(&mut child);
                }
                child
            })
            .collect()
    }
}
