//! Synthetic frames

use lars_track::frame::Frame;
use lars_track::sampling::Stride;
use lars_track::sparse::SolverConfig;
use lars_track::tracker::TrackerConfig;

/// Color of the tracked block
pub const BLOCK: [f64; 3] = [220.0, 40.0, 40.0];

/// Side of the tracked block
pub const BLOCK_SIZE: usize = 10;

/// Textured background so that no two windows look alike
pub fn background(x: usize, y: usize) -> [f64; 3] {
    [((x * 7 + y * 13) % 64) as f64 + 20.0, 60.0, 90.0]
}

/// `width x height` frame with the block's top-left corner at `(bx, by)`
pub fn block_scene(width: usize, height: usize, bx: usize, by: usize) -> Frame {
    Frame::from_fn(width, height, |x, y| {
        if (bx..bx + BLOCK_SIZE).contains(&x) && (by..by + BLOCK_SIZE).contains(&y) {
            BLOCK
        } else {
            background(x, y)
        }
    })
}

/// Frame `k` (one-based) of the sliding-block sequence: 50x50, block
/// starting at (10, 10) and moving one pixel right per frame
pub fn sliding_block(k: usize) -> Frame {
    block_scene(50, 50, 10 + (k - 1), 10)
}

/// Exhaustive-search configuration: every window offset, no projection
pub fn exhaustive_config() -> TrackerConfig {
    TrackerConfig {
        detection_stride: Stride::new(1, 1),
        solver: SolverConfig {
            compression_ratio: 1.0,
            ..SolverConfig::default()
        },
        ..TrackerConfig::default()
    }
}

/// Default strides and scales with the projection disabled
pub fn unprojected_config() -> TrackerConfig {
    TrackerConfig {
        solver: SolverConfig {
            compression_ratio: 1.0,
            ..SolverConfig::default()
        },
        ..TrackerConfig::default()
    }
}
