//! Appearance model: exemplar banks, history and failure state

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::common::errors::TrackerError;
use crate::common::linalg::{hconcat, select_columns};
use crate::common::rng::jitter;
use crate::frame::{BoundingBox, Frame};
use crate::sampling::sample_negatives;

use super::config::{SearchScale, TrackerConfig};
use super::history::{MotionHistory, RecordSource, TrackRecord};

/// Tracking state derived from the consecutive-failure count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackState {
    /// Last detection confirmed
    Tracking,
    /// One failure this frame, an enlarged search is pending
    Retry,
    /// Detection has failed repeatedly; positions are extrapolated
    Lost,
}

impl TrackState {
    pub fn from_failures(failures: usize) -> Self {
        match failures {
            0 => TrackState::Tracking,
            1 => TrackState::Retry,
            _ => TrackState::Lost,
        }
    }
}

/// Everything the tracker knows about the target
///
/// The positive bank always holds exactly `exemplar_count` columns. Column 0
/// is the last confirmed crop; the adaptive region starts at the current slot
/// and receives one batch per confirmation, newest first. The negative bank
/// never exceeds `negative_capacity` columns.
#[derive(Debug, Clone)]
pub struct AppearanceModel {
    config: TrackerConfig,
    patch_width: usize,
    patch_height: usize,
    positives: DMatrix<f64>,
    negatives: DMatrix<f64>,
    sample: SmallVec<[usize; 32]>,
    history: MotionHistory,
    results: Vec<TrackRecord>,
    failures: usize,
}

impl AppearanceModel {
    /// Build the model from the first frame and the initial box
    ///
    /// Fails if the configuration is inconsistent, the box leaves the frame,
    /// or no background patch can be sampled around it.
    pub fn initialize<R: Rng>(
        frame: &Frame,
        initial: BoundingBox,
        config: TrackerConfig,
        rng: &mut R,
    ) -> Result<Self, TrackerError> {
        config.validate()?;
        let window = initial.window()?;
        let patch = frame.patch(&window)?;
        let bbox = BoundingBox::new(
            window.x as f64,
            window.y as f64,
            window.width as f64,
            window.height as f64,
        );

        let nf = config.exemplar_count;
        let mut positives = DMatrix::zeros(patch.len(), nf);
        positives.set_column(0, &patch);
        for j in 1..nf {
            positives.set_column(j, &jitter(rng, &patch, config.exemplar_noise_std));
        }

        let negatives = sample_negatives(
            frame,
            &bbox.position,
            &bbox.size,
            &config.scale(SearchScale::Normal),
            config.negative_stride,
            config.background_noise_std,
            rng,
        )?;
        let negatives = newest_columns(negatives, config.negative_capacity);

        let sample = exemplar_sample(&config, rng);
        let history = MotionHistory::new(&bbox, nf, config.current_slot());

        let mut results = Vec::with_capacity(nf);
        results.push(TrackRecord {
            frame: 1,
            bbox,
            source: RecordSource::Initial,
        });

        log::debug!(
            "model initialized: {}x{} patch, {} positives, {} negatives",
            window.width,
            window.height,
            nf,
            negatives.ncols()
        );

        Ok(Self {
            config,
            patch_width: window.width,
            patch_height: window.height,
            positives,
            negatives,
            sample,
            history,
            results,
            failures: 0,
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Patch `(width, height)` in pixels
    #[inline]
    pub fn patch_size(&self) -> (usize, usize) {
        (self.patch_width, self.patch_height)
    }

    #[inline]
    pub fn failures(&self) -> usize {
        self.failures
    }

    #[inline]
    pub fn state(&self) -> TrackState {
        TrackState::from_failures(self.failures)
    }

    pub fn positives(&self) -> &DMatrix<f64> {
        &self.positives
    }

    pub fn negatives(&self) -> &DMatrix<f64> {
        &self.negatives
    }

    pub fn history(&self) -> &MotionHistory {
        &self.history
    }

    /// Result log, one record per processed frame
    pub fn results(&self) -> &[TrackRecord] {
        &self.results
    }

    /// Bank indices of the stage-1 exemplar sample
    pub fn sample_indices(&self) -> &[usize] {
        &self.sample
    }

    /// Stage-1 targets: the sampled positive exemplars
    pub fn exemplar_targets(&self) -> DMatrix<f64> {
        select_columns(&self.positives, &self.sample)
    }

    /// Stage-2 dictionary: positives followed by negatives
    pub fn verification_dictionary(&self) -> DMatrix<f64> {
        hconcat(&self.positives, &self.negatives)
    }

    /// The batch most recently written to the adaptive region
    pub fn newest_batch(&self) -> DMatrix<f64> {
        self.positives
            .columns(self.config.current_slot(), self.config.batch)
            .into_owned()
    }

    /// Absorb a verified detection
    ///
    /// `patch` holds the raw pixels of the confirmed window and `reported`
    /// the box as it is logged. Shifts the adaptive region by one batch,
    /// samples fresh background around `reported`, updates the history and
    /// clears the failure count. Returns the logged record.
    pub fn confirm<R: Rng>(
        &mut self,
        frame: &Frame,
        patch: &DVector<f64>,
        reported: BoundingBox,
        frame_index: usize,
        rng: &mut R,
    ) -> Result<TrackRecord, TrackerError> {
        if patch.len() != self.positives.nrows() {
            return Err(TrackerError::DimensionMismatch {
                expected: self.positives.nrows(),
                actual: patch.len(),
                context: "confirmed patch length".to_string(),
            });
        }

        let start = self.config.current_slot();
        let batch = self.config.batch;
        let nf = self.config.exemplar_count;
        for j in (start + batch..nf).rev() {
            let older = self.positives.column(j - batch).into_owned();
            self.positives.set_column(j, &older);
        }
        self.positives.set_column(start, patch);
        for j in start + 1..start + batch {
            self.positives
                .set_column(j, &jitter(rng, patch, self.config.exemplar_noise_std));
        }
        self.positives.set_column(0, patch);

        match sample_negatives(
            frame,
            &reported.position,
            &reported.size,
            &self.config.negative_scale(),
            self.config.negative_stride,
            self.config.background_noise_std,
            rng,
        ) {
            Ok(fresh) => self.push_negatives(fresh),
            Err(e) => log::warn!("frame {}: keeping previous negatives: {}", frame_index, e),
        }

        self.history.confirm(&reported);
        let record = TrackRecord {
            frame: frame_index,
            bbox: reported,
            source: RecordSource::Confirmed,
        };
        self.results.push(record);
        self.failures = 0;
        Ok(record)
    }

    /// Count a failed detection attempt
    pub fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Extrapolate the position, append it to the predicted stack and log it
    /// with the current size
    pub fn predict(&mut self, frame_index: usize) -> TrackRecord {
        let position = self.history.extrapolate(
            self.config.motion_blend,
            self.config.motion_window,
            self.config.min_motion_history,
        );
        self.history.push_predicted(position);

        let size = self.history.size();
        let record = TrackRecord {
            frame: frame_index,
            bbox: BoundingBox::new(position.x, position.y, size.x, size.y),
            source: RecordSource::Predicted,
        };
        self.results.push(record);
        record
    }

    /// Append background patches, evicting the oldest beyond capacity
    fn push_negatives(&mut self, fresh: DMatrix<f64>) {
        let joined = hconcat(&self.negatives, &fresh);
        self.negatives = newest_columns(joined, self.config.negative_capacity);
    }
}

/// Keep at most `capacity` trailing columns
fn newest_columns(matrix: DMatrix<f64>, capacity: usize) -> DMatrix<f64> {
    let n = matrix.ncols();
    if n <= capacity {
        matrix
    } else {
        matrix.columns(n - capacity, capacity).into_owned()
    }
}

/// Column 0, `random_exemplars` draws from the non-adaptive region, then
/// `recent_exemplars` spaced entries of the adaptive region
fn exemplar_sample<R: Rng>(config: &TrackerConfig, rng: &mut R) -> SmallVec<[usize; 32]> {
    let start = config.current_slot();
    let mut sample = SmallVec::with_capacity(1 + config.random_exemplars + config.recent_exemplars);
    sample.push(0);
    for _ in 0..config.random_exemplars {
        sample.push(rng.gen_range(0..start));
    }
    for i in 0..config.recent_exemplars {
        sample.push(start + i * config.recent_stride);
    }
    sample
}
