//! Tracker configuration
//!
//! [`TrackerConfig::default`] reproduces the reference tracker. Every field
//! can be overridden from JSON; missing fields keep their default.

use std::path::Path;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::common::errors::TrackerError;
use crate::sampling::Stride;
use crate::sparse::SolverConfig;

/// Which search-region scale a detection attempt uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchScale {
    /// Regular per-frame search
    Normal,
    /// Wider search after a failed attempt
    Enlarged,
}

/// All tunable tracker parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Positive bank size
    pub exemplar_count: usize,
    /// One past the current slot of the history buffers; the adaptive part
    /// of the positive bank starts at `history_split - 1`
    pub history_split: usize,
    /// Exemplars written per confirmed detection (the patch and its jitters)
    pub batch: usize,
    /// Randomly chosen older exemplars in the stage-1 target sample
    pub random_exemplars: usize,
    /// Exemplars taken from the adaptive region for the stage-1 sample
    pub recent_exemplars: usize,
    /// Spacing of the adaptive-region exemplars in the sample
    pub recent_stride: usize,
    /// Maximum size of the negative bank
    pub negative_capacity: usize,

    /// Window strides for candidate detection
    pub detection_stride: Stride,
    /// Window strides for background sampling
    pub negative_stride: Stride,

    /// Region scale of a regular detection
    pub normal_scale: f64,
    /// Region scale after a failed detection
    pub enlarged_scale: f64,
    /// Region scale for background sampling
    pub negative_scale: f64,

    /// Standard deviation of exemplar jitter
    pub exemplar_noise_std: f64,
    /// Standard deviation of the noise that hides the target while sampling
    /// background patches
    pub background_noise_std: f64,

    /// Weight of the last displacement and of the drift term in prediction
    pub motion_blend: f64,
    /// Displacements averaged into the drift term
    pub motion_window: usize,
    /// Predicted positions required before the drift term is used
    pub min_motion_history: usize,

    pub solver: SolverConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            exemplar_count: 200,
            history_split: 100,
            batch: 10,
            random_exemplars: 10,
            recent_exemplars: 11,
            recent_stride: 2,
            negative_capacity: 400,
            detection_stride: Stride::new(4, 4),
            negative_stride: Stride::new(10, 10),
            normal_scale: 2.0,
            enlarged_scale: 3.0,
            negative_scale: 3.0,
            exemplar_noise_std: 1.0,
            background_noise_std: 122.0,
            motion_blend: 0.3,
            motion_window: 8,
            min_motion_history: 10,
            solver: SolverConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Read a configuration from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self, TrackerError> {
        let text = std::fs::read_to_string(path).map_err(|e| TrackerError::Configuration {
            description: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json(&text)
    }

    /// Parse and validate a JSON configuration
    pub fn from_json(text: &str) -> Result<Self, TrackerError> {
        let config: Self = serde_json::from_str(text).map_err(|e| TrackerError::Configuration {
            description: format!("invalid configuration: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Index of the current slot in the history buffers and the first slot of
    /// the adaptive positive region
    #[inline]
    pub fn current_slot(&self) -> usize {
        self.history_split - 1
    }

    /// Region scale of a detection attempt
    pub fn scale(&self, scale: SearchScale) -> Vector2<f64> {
        let s = match scale {
            SearchScale::Normal => self.normal_scale,
            SearchScale::Enlarged => self.enlarged_scale,
        };
        Vector2::repeat(s)
    }

    pub fn negative_scale(&self) -> Vector2<f64> {
        Vector2::repeat(self.negative_scale)
    }

    /// Check that the bank layout and parameters are consistent
    pub fn validate(&self) -> Result<(), TrackerError> {
        let fail = |description: String| Err(TrackerError::Configuration { description });

        if self.history_split < 2 || self.history_split > self.exemplar_count {
            return fail(format!(
                "history_split {} must lie in [2, exemplar_count = {}]",
                self.history_split, self.exemplar_count
            ));
        }
        let adaptive = self.exemplar_count - self.current_slot();
        if self.batch == 0 || self.batch > adaptive {
            return fail(format!(
                "batch {} must lie in [1, {}] (adaptive region size)",
                self.batch, adaptive
            ));
        }
        if self.recent_exemplars > 0
            && self.current_slot() + (self.recent_exemplars - 1) * self.recent_stride >= self.exemplar_count
        {
            return fail(format!(
                "{} recent exemplars with stride {} exceed the positive bank",
                self.recent_exemplars, self.recent_stride
            ));
        }
        if self.negative_capacity == 0 {
            return fail("negative_capacity must be positive".to_string());
        }
        for (name, stride) in [
            ("detection_stride", self.detection_stride),
            ("negative_stride", self.negative_stride),
        ] {
            if stride.rows == 0 || stride.cols == 0 {
                return fail(format!("{} must be positive, got {:?}", name, stride));
            }
        }
        for (name, value) in [
            ("normal_scale", self.normal_scale),
            ("enlarged_scale", self.enlarged_scale),
            ("negative_scale", self.negative_scale),
        ] {
            if !(value > 0.0) || !value.is_finite() {
                return fail(format!("{} must be positive, got {}", name, value));
            }
        }
        if self.exemplar_noise_std < 0.0 || self.background_noise_std < 0.0 {
            return fail("noise standard deviations must be non-negative".to_string());
        }
        if self.min_motion_history < self.motion_window + 2 {
            return fail(format!(
                "min_motion_history {} must be at least motion_window + 2 = {}",
                self.min_motion_history,
                self.motion_window + 2
            ));
        }
        if self.solver.repetitions == 0 {
            return fail("solver.repetitions must be positive".to_string());
        }
        if !(self.solver.tolerance >= 0.0) {
            return fail(format!("solver.tolerance {} must be non-negative", self.solver.tolerance));
        }
        Ok(())
    }
}
