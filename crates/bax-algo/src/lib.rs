//! # bax-algo
//!
//! Evolution-strategies inner loop for the bax experiment pipeline:
//! a population-based, mutation-driven black-box optimizer with a typed,
//! validated configuration and a per-generation run history.

mod evolution;

pub use evolution::{
    EsRun, EvolutionConfig, EvolutionStrategies, GenerationRecord, OptMode, SamplingStrategy,
};
