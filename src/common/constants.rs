//! Numerical constants used throughout the tracker
//!
//! These are fixed properties of the algorithms, kept separate from the
//! user-tunable values in [`TrackerConfig`](crate::tracker::TrackerConfig).

/// Ridge term added to the diagonal of the active-set Gram matrix
///
/// Keeps near-collinear active sets invertible. An active set that is still
/// singular after regularization is reported as
/// [`SolverError::SingularGram`](crate::common::errors::SolverError::SingularGram).
pub const GRAM_RIDGE: f64 = 1e-8;

/// Columns with a squared norm below this are treated as all-zero
///
/// Zero columns are left untouched by normalization and abstain from the
/// ensemble vote.
pub const ZERO_NORM: f64 = 1e-24;

/// Offset between frame pixel coordinates and reported positions
///
/// Confirmed positions are reported one-based: a window whose top-left pixel
/// is `(x, y)` is logged as `(x + 1, y + 1)`. The reported value is also what
/// the position history stores and what the next search region is built from.
pub const REPORT_OFFSET: f64 = 1.0;

/// Pixels trimmed from the right/bottom edge of a search region
///
/// One pixel converts the one-based inclusive edge to zero-based, the other
/// makes the edge exclusive of the scaled bound.
pub const REGION_EDGE_TRIM: f64 = 2.0;

/// Number of channels in a [`Frame`](crate::frame::Frame)
pub const CHANNELS: usize = 3;

/// Stream separation constant for per-round RNG seeding (golden ratio)
pub const STREAM_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;
