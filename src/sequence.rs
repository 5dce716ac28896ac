//! Numbered image sequences on disk
//!
//! A sequence directory holds `1.jpg`, `2.jpg`, ... Frame 1 initializes the
//! tracker; the following frames are tracked.

use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::common::errors::FrameError;
use crate::frame::Frame;

/// Directory of numbered frames
#[derive(Debug, Clone)]
pub struct FrameSequence {
    directory: PathBuf,
    extension: String,
}

impl FrameSequence {
    /// Sequence of `<n>.jpg` files in `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self::with_extension(directory, "jpg")
    }

    pub fn with_extension(directory: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            directory: directory.into(),
            extension: extension.to_string(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of one-based frame `index`
    pub fn path(&self, index: usize) -> PathBuf {
        self.directory.join(format!("{}.{}", index, self.extension))
    }

    /// Decode one-based frame `index`
    pub fn load(&self, index: usize) -> Result<Frame, FrameError> {
        let path = self.path(index);
        if !path.is_file() {
            return Err(FrameError::Missing {
                path: path.display().to_string(),
            });
        }
        let image = image::open(&path).map_err(|e| FrameError::Decode {
            path: path.display().to_string(),
            description: e.to_string(),
        })?;
        Ok(frame_from_rgb(&image.to_rgb8()))
    }
}

/// Convert an 8-bit RGB image to a [`Frame`]
pub fn frame_from_rgb(image: &RgbImage) -> Frame {
    let (width, height) = image.dimensions();
    Frame::from_fn(width as usize, height as usize, |x, y| {
        let p = image.get_pixel(x as u32, y as u32).0;
        [f64::from(p[0]), f64::from(p[1]), f64::from(p[2])]
    })
}
