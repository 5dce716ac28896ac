//! Patch sampling: search regions, sliding windows and background patches
//!
//! - [`region_seg`] cuts a scaled search region around a box
//! - [`CandidateDictionary`] slides a window over it, tagging each column with
//!   its grid position so a winner can be mapped back to frame coordinates
//! - [`sample_negatives`] produces background exemplars with the target hidden

pub mod negatives;
pub mod region;
pub mod windows;

pub use negatives::sample_negatives;
pub use region::{region_bounds, region_seg, Region};
pub use windows::{sliding_windows, CandidateDictionary, Stride, GRID_ROWS};
