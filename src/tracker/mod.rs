//! Single-object tracker
//!
//! - [`AppearanceModel`]: positive/negative exemplar banks and history
//! - [`Detector`] / [`SparseDetector`]: two-stage detect-then-verify search
//! - [`TrackingController`]: per-frame escalation and prediction fallback

pub mod config;
pub mod controller;
pub mod detector;
pub mod history;
pub mod model;

pub use config::{SearchScale, TrackerConfig};
pub use controller::{FrameReport, TrackingController};
pub use detector::{Confirmation, Detection, Detector, Rejection, SparseDetector};
pub use history::{MotionHistory, RecordSource, TrackRecord};
pub use model::{AppearanceModel, TrackState};
