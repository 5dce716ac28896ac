//! Search-region extraction

use nalgebra::Vector2;

use crate::common::constants::REGION_EDGE_TRIM;
use crate::common::errors::PatchError;
use crate::frame::{Frame, Window};

/// Crop of a frame together with where it came from
#[derive(Debug, Clone)]
pub struct Region {
    /// Absolute placement of the crop in the source frame
    pub bounds: Window,
    /// The cropped pixels
    pub pixels: Frame,
}

impl Region {
    /// Absolute top-left corner `(x, y)` of the crop
    #[inline]
    pub fn offset(&self) -> (usize, usize) {
        (self.bounds.x, self.bounds.y)
    }
}

/// Inclusive pixel bounds of the region around `top_left`/`size` scaled by
/// `scale`, before clamping
///
/// Returns `(left_top, right_bottom)`. See [`REGION_EDGE_TRIM`] for the
/// right/bottom convention.
pub fn region_bounds(
    top_left: &Vector2<f64>,
    size: &Vector2<f64>,
    scale: &Vector2<f64>,
) -> (Vector2<f64>, Vector2<f64>) {
    let center = (top_left + size * 0.5).map(f64::ceil);
    let scaled = size.component_mul(scale).map(f64::ceil);
    let left_top = (center - scaled * 0.5).map(f64::ceil);
    let right_bottom = (center + scaled * 0.5).map(f64::floor) - Vector2::repeat(REGION_EDGE_TRIM);
    (left_top, right_bottom)
}

/// Cut the search region around a box out of `frame`
///
/// The region is centred on the box, `scale` times its size, and clamped to
/// the frame. Fails with [`PatchError::EmptyRegion`] when nothing of it lies
/// inside the frame.
pub fn region_seg(
    frame: &Frame,
    top_left: &Vector2<f64>,
    size: &Vector2<f64>,
    scale: &Vector2<f64>,
) -> Result<Region, PatchError> {
    let (left_top, right_bottom) = region_bounds(top_left, size, scale);

    let left = left_top.x.max(0.0);
    let top = left_top.y.max(0.0);
    let right = right_bottom.x.min(frame.width() as f64 - 1.0);
    let bottom = right_bottom.y.min(frame.height() as f64 - 1.0);

    if right < left || bottom < top {
        return Err(PatchError::EmptyRegion {
            left: left_top.x,
            top: left_top.y,
        });
    }

    let bounds = Window::new(
        left as usize,
        top as usize,
        (right - left) as usize + 1,
        (bottom - top) as usize + 1,
    );
    let pixels = frame.crop(&bounds)?;
    Ok(Region { bounds, pixels })
}
