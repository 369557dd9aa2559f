use thiserror::Error;

/// Main error type for the bax pipeline
#[derive(Error, Debug)]
pub enum BaxError {
    #[error("Benchmark error: {0}")]
    Bench(#[from] BenchError),

    #[error("Algorithm error: {0}")]
    Algo(#[from] AlgoError),

    #[error("Experiment error: {0}")]
    Experiment(#[from] ExperimentError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Benchmark-function errors
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Dimension mismatch: objective expects {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Objective produced a non-finite value at the queried point")]
    NonFiniteValue,
}

/// Inner-loop optimizer errors
#[derive(Error, Debug)]
pub enum AlgoError {
    #[error("Invalid algorithm parameter: {parameter}, message: {message}")]
    InvalidParameter { parameter: String, message: String },

    #[error("Initial point has {actual} coordinates, domain has {expected}")]
    InitDimensionMismatch { expected: usize, actual: usize },
}

/// Experiment-manager errors
#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error("Invalid trial range: first trial {first} is after last trial {last}")]
    InvalidTrialRange { first: u32, last: u32 },

    #[error("Surrogate cannot be fitted: {message}")]
    SurrogateUnfit { message: String },

    #[error("Policy produced no candidate at iteration {iteration}")]
    EmptyBatch { iteration: usize },

    #[error("Metric {metric} failed: {message}")]
    MetricFailed { metric: String, message: String },

    #[error("Trial {trial} result file is corrupt: {message}")]
    CorruptTrialRecord { trial: u32, message: String },
}

/// Result type alias for bax operations
pub type BaxResult<T> = Result<T, BaxError>;

/// Macro for creating validation errors
#[macro_export]
macro_rules! validation_error {
    ($($arg:tt)*) => {
        $crate::BaxError::Validation(format!($($arg)*))
    };
}

/// Macro for creating configuration errors
#[macro_export]
macro_rules! config_error {
    ($($arg:tt)*) => {
        $crate::BaxError::Config(format!($($arg)*))
    };
}
