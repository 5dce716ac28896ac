//! Sliding-window candidate dictionaries

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::common::errors::PatchError;
use crate::frame::{Frame, Window};

use super::region::Region;

/// Trailing metadata rows per candidate column: row index, column index
pub const GRID_ROWS: usize = 2;

/// Step between neighbouring windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stride {
    /// Vertical step in pixels
    pub rows: usize,
    /// Horizontal step in pixels
    pub cols: usize,
}

impl Stride {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }
}

/// Slide a `width x height` window over `pixels`
///
/// Emits one column per window position, ordered row-major over the grid.
/// Each column is the flattened patch followed by the window's grid row and
/// grid column index.
pub fn sliding_windows(
    pixels: &Frame,
    width: usize,
    height: usize,
    stride: Stride,
) -> Result<DMatrix<f64>, PatchError> {
    if width == 0 || height == 0 || width > pixels.width() || height > pixels.height() {
        return Err(PatchError::WindowTooLarge {
            window: (width, height),
            region: (pixels.width(), pixels.height()),
        });
    }

    let row_positions = pixels.height() - height + 1;
    let col_positions = pixels.width() - width + 1;
    let grid_rows = (row_positions + stride.rows - 1) / stride.rows;
    let grid_cols = (col_positions + stride.cols - 1) / stride.cols;
    let patch_len = Window::new(0, 0, width, height).len();

    let mut out = DMatrix::zeros(patch_len + GRID_ROWS, grid_rows * grid_cols);
    for gi in 0..grid_rows {
        for gj in 0..grid_cols {
            let window = Window::new(gj * stride.cols, gi * stride.rows, width, height);
            let k = gi * grid_cols + gj;
            let mut col = out.column_mut(k);
            col.rows_mut(0, patch_len)
                .copy_from(&pixels.patch_unchecked(&window));
            col[patch_len] = gi as f64;
            col[patch_len + 1] = gj as f64;
        }
    }
    Ok(out)
}

/// Candidate windows of a search region, tagged with their grid position
#[derive(Debug, Clone)]
pub struct CandidateDictionary {
    columns: DMatrix<f64>,
    bounds: Window,
    width: usize,
    height: usize,
    stride: Stride,
}

impl CandidateDictionary {
    /// Sample every window of `width x height` in `region`
    pub fn sample(
        region: &Region,
        width: usize,
        height: usize,
        stride: Stride,
    ) -> Result<Self, PatchError> {
        let columns = sliding_windows(&region.pixels, width, height, stride)?;
        Ok(Self {
            columns,
            bounds: region.bounds,
            width,
            height,
            stride,
        })
    }

    /// Number of candidate windows
    #[inline]
    pub fn len(&self) -> usize {
        self.columns.ncols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.columns.ncols() == 0
    }

    /// Length of one flattened patch (without the grid rows)
    #[inline]
    pub fn patch_len(&self) -> usize {
        self.columns.nrows() - GRID_ROWS
    }

    /// Full columns including the trailing grid rows
    pub fn columns(&self) -> &DMatrix<f64> {
        &self.columns
    }

    /// Patch pixels only, one column per candidate
    pub fn atoms(&self) -> DMatrix<f64> {
        self.columns.rows(0, self.patch_len()).into_owned()
    }

    /// Pixels of candidate `j`
    pub fn atom(&self, j: usize) -> DVector<f64> {
        self.columns.column(j).rows(0, self.patch_len()).into_owned()
    }

    /// Grid `(row, col)` of candidate `j`, read back from its metadata rows
    pub fn grid(&self, j: usize) -> (usize, usize) {
        let n = self.patch_len();
        (
            self.columns[(n, j)] as usize,
            self.columns[(n + 1, j)] as usize,
        )
    }

    /// Absolute frame window of candidate `j`
    pub fn frame_window(&self, j: usize) -> Window {
        let (gi, gj) = self.grid(j);
        Window::new(
            self.bounds.x + gj * self.stride.cols,
            self.bounds.y + gi * self.stride.rows,
            self.width,
            self.height,
        )
    }
}
