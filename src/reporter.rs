//! Observability for tracker execution.
//!
//! [`TrackReporter`] receives callbacks at the interesting points of a frame:
//! every detection attempt, every fallback prediction and the finished frame.
//! The default [`NoOpReporter`] compiles to nothing.
//!
//! # Example
//!
//! ```
//! use lars_track::reporter::{DebugReporter, TrackReporter};
//! use lars_track::tracker::{RecordSource, TrackRecord};
//! use lars_track::frame::BoundingBox;
//!
//! let mut reporter = DebugReporter::new();
//! reporter.on_prediction(&TrackRecord {
//!     frame: 2,
//!     bbox: BoundingBox::new(1.0, 2.0, 10.0, 10.0),
//!     source: RecordSource::Predicted,
//! });
//! assert_eq!(reporter.predictions().len(), 1);
//! ```

use crate::tracker::{Detection, FrameReport, RecordSource, SearchScale, TrackRecord};

/// Observer of tracker execution.
///
/// All methods have empty default implementations, so implementors only
/// override the events they care about. Callbacks take `&mut self`; reporters
/// need not be `Send` or `Sync`.
pub trait TrackReporter {
    /// Called after every detector call, before the model is updated.
    fn on_detection(&mut self, _frame: usize, _scale: SearchScale, _detection: &Detection) {}

    /// Called when a frame falls back to motion prediction.
    fn on_prediction(&mut self, _record: &TrackRecord) {}

    /// Called once the frame is fully processed.
    fn on_frame_complete(&mut self, _report: &FrameReport) {}
}

/// Reporter that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl NoOpReporter {
    pub fn new() -> Self {
        Self
    }
}

impl TrackReporter for NoOpReporter {}

/// Reporter that captures every event for later inspection.
#[derive(Debug, Clone, Default)]
pub struct DebugReporter {
    detections: Vec<(usize, SearchScale, Detection)>,
    predictions: Vec<TrackRecord>,
    frames: Vec<FrameReport>,
}

impl DebugReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.detections.clear();
        self.predictions.clear();
        self.frames.clear();
    }

    /// Captured detector calls as `(frame, scale, outcome)`.
    pub fn detections(&self) -> &[(usize, SearchScale, Detection)] {
        &self.detections
    }

    pub fn predictions(&self) -> &[TrackRecord] {
        &self.predictions
    }

    pub fn frames(&self) -> &[FrameReport] {
        &self.frames
    }

    /// Detector calls made while processing `frame`.
    pub fn calls_in_frame(&self, frame: usize) -> usize {
        self.detections.iter().filter(|(f, _, _)| *f == frame).count()
    }
}

impl TrackReporter for DebugReporter {
    fn on_detection(&mut self, frame: usize, scale: SearchScale, detection: &Detection) {
        self.detections.push((frame, scale, detection.clone()));
    }

    fn on_prediction(&mut self, record: &TrackRecord) {
        self.predictions.push(*record);
    }

    fn on_frame_complete(&mut self, report: &FrameReport) {
        self.frames.push(report.clone());
    }
}

/// Reporter that logs events through the `log` crate.
///
/// - frame outcomes: INFO
/// - detection attempts: DEBUG
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }
}

impl TrackReporter for LoggingReporter {
    fn on_detection(&mut self, frame: usize, scale: SearchScale, detection: &Detection) {
        match detection {
            Detection::Confirmed(c) => log::debug!(
                "frame {}: {:?} search confirmed window ({}, {})",
                frame,
                scale,
                c.window.x,
                c.window.y
            ),
            Detection::Rejected(r) => log::debug!("frame {}: {:?} search rejected: {:?}", frame, scale, r),
        }
    }

    fn on_frame_complete(&mut self, report: &FrameReport) {
        let r = &report.record;
        match r.source {
            RecordSource::Predicted => log::info!(
                "frame {}: object lost, predicted at ({:.1}, {:.1})",
                r.frame,
                r.bbox.position.x,
                r.bbox.position.y
            ),
            _ => log::info!(
                "frame {}: object found at ({}, {}) size {}x{}",
                r.frame,
                r.bbox.position.x,
                r.bbox.position.y,
                r.bbox.size.x,
                r.bbox.size.y
            ),
        }
    }
}
