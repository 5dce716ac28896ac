//! Error types for the solver, the patch sampler, the tracker and frame input
//!
//! Object-not-found is not an error: it is tracker state. These types cover
//! invalid inputs and numerical failures only.

use std::fmt;

/// Errors raised by the sparse solvers
#[derive(Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Active-set Gram matrix could not be inverted even after regularization
    SingularGram {
        /// Size of the active set at the failing iteration
        active: usize,
    },

    /// Dimension mismatch between target and dictionary
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Which dimension mismatched
        context: String,
    },

    /// Dictionary or target set has no columns
    EmptyDictionary,

    /// Non-finite values in the solver inputs
    NumericalInstability {
        /// Description of the issue
        description: String,
    },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::SingularGram { active } => {
                write!(f, "Gram matrix of {} active atoms is singular", active)
            }
            SolverError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
            SolverError::EmptyDictionary => write!(f, "Dictionary has no columns"),
            SolverError::NumericalInstability { description } => {
                write!(f, "Numerical instability: {}", description)
            }
        }
    }
}

impl std::error::Error for SolverError {}

/// Errors raised while cutting regions and windows out of a frame
#[derive(Debug, Clone, PartialEq)]
pub enum PatchError {
    /// The clamped search region contains no pixels
    EmptyRegion {
        /// Requested left edge
        left: f64,
        /// Requested top edge
        top: f64,
    },

    /// The sliding window does not fit inside the region
    WindowTooLarge {
        /// Window size (width, height)
        window: (usize, usize),
        /// Region size (width, height)
        region: (usize, usize),
    },

    /// A bounding box reaches outside the frame
    OutOfFrame {
        /// Description of the offending box
        description: String,
    },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchError::EmptyRegion { left, top } => {
                write!(f, "Search region at ({}, {}) is empty", left, top)
            }
            PatchError::WindowTooLarge { window, region } => {
                write!(
                    f,
                    "Window {}x{} does not fit in region {}x{}",
                    window.0, window.1, region.0, region.1
                )
            }
            PatchError::OutOfFrame { description } => {
                write!(f, "Box outside frame: {}", description)
            }
        }
    }
}

impl std::error::Error for PatchError {}

/// Errors raised by the tracker
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerError {
    /// Sparse solver failed
    Solver(SolverError),

    /// Region or window extraction failed
    Patch(PatchError),

    /// Configuration error
    Configuration {
        /// Description of the configuration issue
        description: String,
    },

    /// Frame or patch dimensions do not match the model
    DimensionMismatch {
        /// What was expected
        expected: usize,
        /// What was received
        actual: usize,
        /// Context (e.g. "patch length")
        context: String,
    },
}

impl fmt::Display for TrackerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackerError::Solver(e) => write!(f, "Sparse solver failed: {}", e),
            TrackerError::Patch(e) => write!(f, "Patch sampling failed: {}", e),
            TrackerError::Configuration { description } => {
                write!(f, "Configuration error: {}", description)
            }
            TrackerError::DimensionMismatch {
                expected,
                actual,
                context,
            } => {
                write!(
                    f,
                    "Dimension mismatch for {}: expected {}, got {}",
                    context, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for TrackerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackerError::Solver(e) => Some(e),
            TrackerError::Patch(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SolverError> for TrackerError {
    fn from(e: SolverError) -> Self {
        TrackerError::Solver(e)
    }
}

impl From<PatchError> for TrackerError {
    fn from(e: PatchError) -> Self {
        TrackerError::Patch(e)
    }
}

/// Errors raised while reading frames from disk
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// The frame file does not exist
    Missing {
        /// Path that was looked up
        path: String,
    },

    /// The file exists but could not be decoded
    Decode {
        /// Offending file
        path: String,
        /// Decoder message
        description: String,
    },
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Missing { path } => write!(f, "Frame {} not found", path),
            FrameError::Decode { path, description } => {
                write!(f, "Cannot decode frame {}: {}", path, description)
            }
        }
    }
}

impl std::error::Error for FrameError {}
