//! Two-stage detect-then-verify search

use nalgebra::{DMatrix, DVector};
use rand::Rng;

use crate::common::constants::REPORT_OFFSET;
use crate::common::errors::{PatchError, TrackerError};
use crate::frame::{BoundingBox, Frame, Window};
use crate::sampling::{region_seg, CandidateDictionary};
use crate::sparse::{EnsembleSolver, SolverConfig};

use super::config::SearchScale;
use super::model::AppearanceModel;

/// A verified detection, not yet absorbed into the model
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    /// Box as it is reported and stored in the history
    pub reported: BoundingBox,
    /// Winning window in frame pixel coordinates
    pub window: Window,
    /// Raw pixels of the winning window
    pub patch: DVector<f64>,
    /// Stage-1 winner among the candidate windows
    pub candidate: usize,
    /// Stage-2 winner in the verification dictionary
    pub exemplar: usize,
}

/// Why a detection attempt failed
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    /// No candidate window won the stage-1 vote
    NotLocalized,
    /// Stage-2 vote produced no winner
    Unverified,
    /// The candidate is best explained by background column `index` of the
    /// verification dictionary
    Background { index: usize },
    /// The search region could not be sampled
    Region(PatchError),
}

/// Outcome of one detection attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Detection {
    Confirmed(Confirmation),
    Rejected(Rejection),
}

impl Detection {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Detection::Confirmed(_))
    }
}

/// Locates the target in a frame
///
/// Implementations only look at the model; the controller applies the
/// outcome.
pub trait Detector {
    fn detect<R: Rng>(
        &mut self,
        frame: &Frame,
        model: &AppearanceModel,
        scale: SearchScale,
        rng: &mut R,
    ) -> Result<Detection, TrackerError>;
}

/// Sparse-coding detector
///
/// Stage 1 codes the sampled positive exemplars against every candidate
/// window of the search region. Stage 2 codes the winning window against the
/// positive and negative banks and accepts it only if a positive exemplar
/// wins.
#[derive(Debug, Clone, Default)]
pub struct SparseDetector {
    solver: EnsembleSolver,
}

impl SparseDetector {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            solver: EnsembleSolver::new(config),
        }
    }

    pub fn solver(&self) -> &EnsembleSolver {
        &self.solver
    }
}

impl Detector for SparseDetector {
    fn detect<R: Rng>(
        &mut self,
        frame: &Frame,
        model: &AppearanceModel,
        scale: SearchScale,
        rng: &mut R,
    ) -> Result<Detection, TrackerError> {
        let config = model.config();
        let (width, height) = model.patch_size();
        let anchor = model.history().search_anchor();
        let size = model.history().size();

        let candidates = match region_seg(frame, &anchor, &size, &config.scale(scale))
            .and_then(|region| CandidateDictionary::sample(&region, width, height, config.detection_stride))
        {
            Ok(c) => c,
            Err(e) => return Ok(Detection::Rejected(Rejection::Region(e))),
        };

        let stage1 = self.solver.solve(&model.exemplar_targets(), &candidates.atoms(), rng)?;
        let candidate = match stage1.winner {
            Some(j) => j,
            None => return Ok(Detection::Rejected(Rejection::NotLocalized)),
        };
        let window = candidates.frame_window(candidate);
        log::debug!(
            "stage 1: candidate {} of {} at ({}, {})",
            candidate,
            candidates.len(),
            window.x,
            window.y
        );

        let patch = candidates.atom(candidate);
        let target = DMatrix::from_column_slice(patch.len(), 1, patch.as_slice());
        let stage2 = self.solver.solve(&target, &model.verification_dictionary(), rng)?;
        let exemplar = match stage2.winner {
            Some(j) if j < config.exemplar_count => j,
            Some(index) => {
                log::debug!("stage 2: background column {} won", index);
                return Ok(Detection::Rejected(Rejection::Background { index }));
            }
            None => return Ok(Detection::Rejected(Rejection::Unverified)),
        };
        log::debug!("stage 2: exemplar {} confirmed", exemplar);

        let reported = BoundingBox::new(
            window.x as f64 + REPORT_OFFSET,
            window.y as f64 + REPORT_OFFSET,
            width as f64,
            height as f64,
        );
        Ok(Detection::Confirmed(Confirmation {
            reported,
            window,
            patch,
            candidate,
            exemplar,
        }))
    }
}
