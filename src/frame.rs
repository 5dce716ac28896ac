//! Frames, windows and bounding boxes

use nalgebra::{DVector, Vector2};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::common::constants::CHANNELS;
use crate::common::errors::{PatchError, TrackerError};

/// Dense RGB image with `f64` samples
///
/// Storage is row-major with interleaved channels: sample `(x, y, c)` lives at
/// `(y * width + x) * 3 + c`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

impl Frame {
    /// Wrap raw interleaved RGB samples
    pub fn new(width: usize, height: usize, data: Vec<f64>) -> Result<Self, TrackerError> {
        let expected = width * height * CHANNELS;
        if data.len() != expected {
            return Err(TrackerError::DimensionMismatch {
                expected,
                actual: data.len(),
                context: "frame samples".to_string(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Frame with every pixel set to `rgb`
    pub fn filled(width: usize, height: usize, rgb: [f64; 3]) -> Self {
        Self::from_fn(width, height, |_, _| rgb)
    }

    /// Frame whose pixel `(x, y)` is `f(x, y)`
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> [f64; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [f64; 3] {
        let i = (y * self.width + x) * CHANNELS;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    #[inline]
    pub fn set_pixel(&mut self, x: usize, y: usize, rgb: [f64; 3]) {
        let i = (y * self.width + x) * CHANNELS;
        self.data[i..i + CHANNELS].copy_from_slice(&rgb);
    }

    /// Whether `window` lies entirely inside the frame
    pub fn contains(&self, window: &Window) -> bool {
        window.x + window.width <= self.width && window.y + window.height <= self.height
    }

    /// Copy of the pixels under `window`
    pub fn crop(&self, window: &Window) -> Result<Frame, PatchError> {
        self.check(window)?;
        let mut data = Vec::with_capacity(window.len());
        for y in window.y..window.y + window.height {
            let start = (y * self.width + window.x) * CHANNELS;
            data.extend_from_slice(&self.data[start..start + window.width * CHANNELS]);
        }
        Ok(Frame {
            width: window.width,
            height: window.height,
            data,
        })
    }

    /// Flattened pixels under `window`, row by row, channel-interleaved
    pub fn patch(&self, window: &Window) -> Result<DVector<f64>, PatchError> {
        self.check(window)?;
        Ok(self.patch_unchecked(window))
    }

    pub(crate) fn patch_unchecked(&self, window: &Window) -> DVector<f64> {
        let mut out = DVector::zeros(window.len());
        let row_len = window.width * CHANNELS;
        for (r, y) in (window.y..window.y + window.height).enumerate() {
            let start = (y * self.width + window.x) * CHANNELS;
            out.rows_mut(r * row_len, row_len)
                .copy_from_slice(&self.data[start..start + row_len]);
        }
        out
    }

    /// Overwrite the pixels under `window` (clipped to the frame) with
    /// `N(0, std^2)` noise
    pub fn fill_noise<R: Rng>(&mut self, window: &Window, std: f64, rng: &mut R) {
        let x_end = (window.x + window.width).min(self.width);
        let y_end = (window.y + window.height).min(self.height);
        for y in window.y.min(y_end)..y_end {
            for x in window.x.min(x_end)..x_end {
                let i = (y * self.width + x) * CHANNELS;
                for v in &mut self.data[i..i + CHANNELS] {
                    *v = std * rng.sample::<f64, _>(StandardNormal);
                }
            }
        }
    }

    fn check(&self, window: &Window) -> Result<(), PatchError> {
        if self.contains(window) {
            Ok(())
        } else {
            Err(PatchError::OutOfFrame {
                description: format!(
                    "window {:?} in {}x{} frame",
                    window, self.width, self.height
                ),
            })
        }
    }
}

/// Integer rectangle in frame pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(x: usize, y: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of samples in a flattened patch of this window
    #[inline]
    pub fn len(&self) -> usize {
        self.width * self.height * CHANNELS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Position and size of the tracked object
///
/// `position` is the top-left corner `(x, y)` and `size` is
/// `(width, height)`. Positions may be fractional once motion prediction
/// kicks in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub position: Vector2<f64>,
    pub size: Vector2<f64>,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            position: Vector2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Pixel window covered by this box, if it has non-negative integer extent
    pub fn window(&self) -> Result<Window, PatchError> {
        let p = self.position.map(f64::round);
        let s = self.size.map(f64::round);
        if p.x < 0.0 || p.y < 0.0 || s.x < 1.0 || s.y < 1.0 {
            return Err(PatchError::OutOfFrame {
                description: format!("box {:?}", self),
            });
        }
        Ok(Window::new(p.x as usize, p.y as usize, s.x as usize, s.y as usize))
    }
}
