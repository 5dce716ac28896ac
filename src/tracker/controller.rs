//! Per-frame tracking state machine
//!
//! A frame that starts with the last detection confirmed searches with the
//! normal scale and, on failure, once more with the enlarged scale. A frame
//! that starts after failures makes a single enlarged attempt. When every
//! attempt fails the position is extrapolated instead.
//!
//! A tracking frame ends with zero or two failures, so no frame starts in
//! [`TrackState::Retry`]; it is only observable between the two attempts.

use rand::Rng;

use crate::common::errors::TrackerError;
use crate::frame::{BoundingBox, Frame};
use crate::reporter::{NoOpReporter, TrackReporter};

use super::config::{SearchScale, TrackerConfig};
use super::detector::{Detection, Detector, Rejection, SparseDetector};
use super::history::TrackRecord;
use super::model::{AppearanceModel, TrackState};

/// What happened in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    /// One-based frame number
    pub frame_index: usize,
    /// The record logged for this frame
    pub record: TrackRecord,
    pub state_before: TrackState,
    pub state: TrackState,
    pub detector_calls: usize,
    /// Failed attempts, in order
    pub rejections: Vec<Rejection>,
}

impl FrameReport {
    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Tracking
    }
}

/// Drives a [`Detector`] over a frame sequence and keeps the model current
#[derive(Debug, Clone)]
pub struct TrackingController<D: Detector> {
    detector: D,
    model: AppearanceModel,
    frame_index: usize,
}

impl TrackingController<SparseDetector> {
    /// Initialize the model on the first frame and attach a sparse detector
    pub fn initialize<R: Rng>(
        first: &Frame,
        initial: BoundingBox,
        config: TrackerConfig,
        rng: &mut R,
    ) -> Result<Self, TrackerError> {
        let detector = SparseDetector::new(config.solver);
        let model = AppearanceModel::initialize(first, initial, config, rng)?;
        Ok(Self::new(detector, model))
    }
}

impl<D: Detector> TrackingController<D> {
    /// Controller for a model built on frame 1
    pub fn new(detector: D, model: AppearanceModel) -> Self {
        Self {
            detector,
            model,
            frame_index: 1,
        }
    }

    pub fn model(&self) -> &AppearanceModel {
        &self.model
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Number of the last processed frame
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn results(&self) -> &[TrackRecord] {
        self.model.results()
    }

    /// Process the next frame
    pub fn step<R: Rng>(&mut self, frame: &Frame, rng: &mut R) -> Result<FrameReport, TrackerError> {
        self.step_with_reporter(frame, rng, &mut NoOpReporter)
    }

    /// Process the next frame, reporting every attempt
    ///
    /// Solver failures abort the frame and are returned as errors; a target
    /// that cannot be found is a normal outcome.
    pub fn step_with_reporter<R: Rng, P: TrackReporter>(
        &mut self,
        frame: &Frame,
        rng: &mut R,
        reporter: &mut P,
    ) -> Result<FrameReport, TrackerError> {
        self.frame_index += 1;
        let frame_index = self.frame_index;
        let state_before = self.model.state();

        let attempts: &[SearchScale] = match state_before {
            TrackState::Tracking => &[SearchScale::Normal, SearchScale::Enlarged],
            // Retry never starts a frame
            TrackState::Retry | TrackState::Lost => &[SearchScale::Enlarged],
        };

        let mut rejections = Vec::new();
        let mut confirmed = None;
        for &scale in attempts {
            let detection = self.detector.detect(frame, &self.model, scale, rng)?;
            reporter.on_detection(frame_index, scale, &detection);
            match detection {
                Detection::Confirmed(c) => {
                    confirmed = Some(self.model.confirm(frame, &c.patch, c.reported, frame_index, rng)?);
                    break;
                }
                Detection::Rejected(r) => {
                    self.model.record_failure();
                    log::debug!(
                        "frame {}: {:?} attempt failed ({} consecutive)",
                        frame_index,
                        scale,
                        self.model.failures()
                    );
                    rejections.push(r);
                }
            }
        }

        let detector_calls = rejections.len() + usize::from(confirmed.is_some());
        let record = match confirmed {
            Some(record) => record,
            None => {
                let record = self.model.predict(frame_index);
                reporter.on_prediction(&record);
                record
            }
        };

        let report = FrameReport {
            frame_index,
            record,
            state_before,
            state: self.model.state(),
            detector_calls,
            rejections,
        };
        reporter.on_frame_complete(&report);
        Ok(report)
    }
}
