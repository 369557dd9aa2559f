//! Trial-record persistence.

use bax_types::{BaxResult, ExperimentError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::trial::{Trial, TrialStatus};

/// Path of a trial's result file inside `dir`.
pub fn trial_path(dir: &Path, trial_number: u32) -> PathBuf {
    dir.join(format!("trial_{trial_number}.json"))
}

/// Persist a trial record as pretty-printed JSON, creating `dir` as needed.
pub fn save_trial(dir: &Path, trial: &Trial) -> BaxResult<()> {
    fs::create_dir_all(dir)?;
    let path = trial_path(dir, trial.trial_number);
    let json = serde_json::to_string_pretty(trial)?;
    fs::write(&path, json)?;
    debug!(path = %path.display(), "trial record written");
    Ok(())
}

/// Load a previously saved trial record.
pub fn load_trial(dir: &Path, trial_number: u32) -> BaxResult<Trial> {
    let path = trial_path(dir, trial_number);
    let raw = fs::read_to_string(&path)?;
    serde_json::from_str(&raw).map_err(|e| {
        ExperimentError::CorruptTrialRecord {
            trial: trial_number,
            message: e.to_string(),
        }
        .into()
    })
}

/// Whether a completed record for `trial_number` already exists in `dir`.
pub fn completed_trial_exists(dir: &Path, trial_number: u32) -> bool {
    load_trial(dir, trial_number)
        .map(|trial| trial.status == TrialStatus::Completed)
        .unwrap_or(false)
}
