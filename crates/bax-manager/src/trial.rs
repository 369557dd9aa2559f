//! Trial lifecycle and records.

use bax_types::Point;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A single objective observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub x: Point,
    pub y: f64,
    /// Iteration that produced the query; 0 covers the initial design.
    pub iteration: usize,
}

/// Lifecycle state of a trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrialStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

/// One independent replicate of the experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    pub id: Uuid,
    pub trial_number: u32,
    /// RNG seed this trial ran with.
    pub seed: u64,
    pub status: TrialStatus,
    pub observations: Vec<Observation>,
    /// Metric name → per-iteration values, oldest first.
    pub metrics: HashMap<String, Vec<f64>>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl Trial {
    pub fn new(trial_number: u32, seed: u64) -> Self {
        Self {
            id: Uuid::new_v4(),
            trial_number,
            seed,
            status: TrialStatus::Pending,
            observations: Vec::new(),
            metrics: HashMap::new(),
            created_at: Utc::now(),
            started_at: None,
            finished_at: None,
            error: None,
        }
    }

    pub fn mark_running(&mut self) {
        self.status = TrialStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn mark_completed(&mut self) {
        self.status = TrialStatus::Completed;
        self.finished_at = Some(Utc::now());
    }

    pub fn mark_failed(&mut self, error: String) {
        self.status = TrialStatus::Failed;
        self.finished_at = Some(Utc::now());
        self.error = Some(error);
    }

    pub fn record_observation(&mut self, x: Point, y: f64, iteration: usize) {
        self.observations.push(Observation { x, y, iteration });
    }

    pub fn record_metric(&mut self, name: &str, value: f64) {
        self.metrics.entry(name.to_string()).or_default().push(value);
    }

    /// Best observation so far under maximization.
    pub fn best_observed(&self) -> Option<&Observation> {
        self.observations.iter().max_by(|a, b| {
            a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
