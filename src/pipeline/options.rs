use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CalculusError;

/// Runtime options for the evaluation pipeline
///
/// Missing fields take their defaults when loaded from JSON:
///
/// ```json
/// { "sample_points": 400, "use_cache": false }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationOptions {
    /// Points in the plotted series (default: 200)
    pub sample_points: usize,

    /// Largest accepted rectangle count (default: 1 000 000)
    ///
    /// Values above [`MAX_PARTITIONS`](crate::sampler::MAX_PARTITIONS) are still
    /// rejected by the sampler.
    pub max_resolution: usize,

    /// Largest accepted `sample_points` (default: 100 000)
    ///
    /// Values above [`MAX_SAMPLES`](crate::sampler::MAX_SAMPLES) are still
    /// rejected by the sampler.
    pub max_sample_points: usize,

    /// Reuse exact values across identical requests (default: true)
    pub use_cache: bool,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            sample_points: 200,
            max_resolution: 1_000_000,
            max_sample_points: 100_000,
            use_cache: true,
        }
    }
}

impl EvaluationOptions {
    pub fn from_json(json: &str) -> Result<Self, CalculusError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CalculusError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Set the number of points in the plotted series
    pub fn with_sample_points(mut self, sample_points: usize) -> Self {
        self.sample_points = sample_points;
        self
    }

    pub fn with_max_resolution(mut self, max_resolution: usize) -> Self {
        self.max_resolution = max_resolution;
        self
    }

    pub fn with_max_sample_points(mut self, max_sample_points: usize) -> Self {
        self.max_sample_points = max_sample_points;
        self
    }

    /// Enable or disable the exact-value cache
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }
}
