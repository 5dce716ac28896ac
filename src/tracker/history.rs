//! Position history, predicted positions and the per-frame result log

use std::collections::VecDeque;

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::frame::BoundingBox;

/// How a logged position was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordSource {
    /// The user-supplied box of the first frame
    Initial,
    /// A verified detection
    Confirmed,
    /// Motion extrapolation after the detector gave up
    Predicted,
}

/// One entry of the result log
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// One-based frame number
    pub frame: usize,
    pub bbox: BoundingBox,
    pub source: RecordSource,
}

/// Fixed-length history of confirmed boxes plus the predicted-position stack
///
/// The position and size buffers always hold `len` entries. Index
/// `current` is the most recent confirmed value; entries after it are older,
/// entries before it keep the seed values.
///
/// The predicted stack holds confirmed positions newest first, with motion
/// predictions appended behind them. Its front is always the last confirmed
/// position.
#[derive(Debug, Clone)]
pub struct MotionHistory {
    positions: Vec<Vector2<f64>>,
    sizes: Vec<Vector2<f64>>,
    current: usize,
    /// Confirmed newest first, then appended predictions
    predicted: VecDeque<Vector2<f64>>,
}

impl MotionHistory {
    /// History of `len` copies of `initial`, current slot `current`
    pub fn new(initial: &BoundingBox, len: usize, current: usize) -> Self {
        debug_assert!(current > 0 && current < len);
        let positions = vec![initial.position; len];
        let sizes = vec![initial.size; len];

        let mut predicted = VecDeque::with_capacity(len);
        let p = positions[current];
        predicted.push_back(p + p - positions[current - 1]);
        predicted.push_back(p);

        Self {
            positions,
            sizes,
            current,
            predicted,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vector2<f64>] {
        &self.positions
    }

    pub fn sizes(&self) -> &[Vector2<f64>] {
        &self.sizes
    }

    /// Most recent confirmed position
    pub fn position(&self) -> Vector2<f64> {
        self.positions[self.current]
    }

    /// Most recent confirmed size
    pub fn size(&self) -> Vector2<f64> {
        self.sizes[self.current]
    }

    /// Confirmed positions newest first, followed by appended predictions
    pub fn predicted(&self) -> &VecDeque<Vector2<f64>> {
        &self.predicted
    }

    /// Where the next search is centred: the last confirmed position
    pub fn search_anchor(&self) -> Vector2<f64> {
        self.predicted.front().copied().unwrap_or_else(|| self.position())
    }

    /// Store a confirmed box, dropping the oldest entry
    pub fn confirm(&mut self, bbox: &BoundingBox) {
        let current = self.current;
        self.positions[current..].rotate_right(1);
        self.sizes[current..].rotate_right(1);
        self.positions[current] = bbox.position;
        self.sizes[current] = bbox.size;
        self.predicted.push_front(bbox.position);
        self.predicted.truncate(self.positions.len());
    }

    /// Extrapolate the next position from the front of the predicted stack
    ///
    /// `p0 + blend * round(p0 - p1) + blend * drift`, where `p0` and `p1` are
    /// the two newest confirmed entries and drift is the mean
    /// of the last `window` displacements once at least `min_history`
    /// predictions exist, zero before.
    pub fn extrapolate(&self, blend: f64, window: usize, min_history: usize) -> Vector2<f64> {
        let p = &self.predicted;
        let p0 = p[0];
        let p1 = p.get(1).copied().unwrap_or(p0);

        let drift = if window > 0 && p.len() >= min_history.max(window + 2) {
            let sum = (1..=window).fold(Vector2::zeros(), |acc, j| acc + (p[j] - p[j + 1]));
            sum / window as f64
        } else {
            Vector2::zeros()
        };

        p0 + (p0 - p1).map(f64::round) * blend + drift * blend
    }

    /// Append a prediction behind the confirmed entries
    ///
    /// Once the stack is full the previous tail entry is replaced.
    pub fn push_predicted(&mut self, position: Vector2<f64>) {
        if self.predicted.len() >= self.positions.len() {
            self.predicted.pop_back();
        }
        self.predicted.push_back(position);
    }
}
