/*!
# lars-track - sparse-coding single-object tracker

Tracks one object through a frame sequence. The object's appearance is a bank
of exemplar patches; every frame, candidate windows around the predicted
position are matched against the bank by LARS sparse coding over random
projections, and the winner is verified against positive and background
exemplars before it is accepted.

## Modules

- [`sparse`] - LARS solver and the randomized-projection ensemble
- [`sampling`] - search regions, sliding windows, background patches
- [`tracker`] - appearance model, two-stage detector, per-frame controller
- [`reporter`] - observers for per-frame events
- [`frame`] - frames, windows, bounding boxes
- [`sequence`] / [`options`] - image-sequence input and CLI options
- [`common`] - errors, RNG, linear algebra helpers, constants

## Example

```rust,no_run
use lars_track::common::rng::SimpleRng;
use lars_track::frame::{BoundingBox, Frame};
use lars_track::tracker::{TrackerConfig, TrackingController};

let mut rng = SimpleRng::new(42);
let first = Frame::filled(320, 240, [0.0, 0.0, 0.0]);
let mut tracker = TrackingController::initialize(
    &first,
    BoundingBox::new(153.0, 4.0, 41.0, 30.0),
    TrackerConfig::default(),
    &mut rng,
)
.unwrap();

let next = Frame::filled(320, 240, [0.0, 0.0, 0.0]);
let report = tracker.step(&next, &mut rng).unwrap();
println!("frame {}: {:?}", report.frame_index, report.record.bbox);
```
*/

/// Errors, RNG, linear algebra helpers and constants
pub mod common;

/// Frames, pixel windows and bounding boxes
pub mod frame;

/// Search-region and sliding-window sampling
pub mod sampling;

/// Sparse coding: LARS and the randomized ensemble
pub mod sparse;

/// Appearance model, detector and tracking controller
pub mod tracker;

/// Per-frame observers
pub mod reporter;

/// Numbered image sequences
pub mod sequence;

/// Command-line options of the `trackimg` binary
pub mod options;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use common::errors::{FrameError, PatchError, SolverError, TrackerError};
pub use common::rng::SimpleRng;
pub use frame::{BoundingBox, Frame, Window};
pub use reporter::{DebugReporter, LoggingReporter, NoOpReporter, TrackReporter};
pub use sparse::{EnsembleSolver, SolverConfig};
pub use tracker::{
    AppearanceModel, Detection, Detector, FrameReport, RecordSource, SearchScale, SparseDetector,
    TrackRecord, TrackState, TrackerConfig, TrackingController,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
