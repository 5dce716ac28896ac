//! Detector that replays scripted outcomes

use std::collections::VecDeque;

use rand::Rng;

use lars_track::common::constants::REPORT_OFFSET;
use lars_track::common::errors::{SolverError, TrackerError};
use lars_track::frame::{BoundingBox, Frame, Window};
use lars_track::tracker::{
    AppearanceModel, Confirmation, Detection, Detector, Rejection, SearchScale,
};

/// One scripted detector answer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// Confirm the window with this frame top-left corner
    Hit(usize, usize),
    /// Reject
    Miss,
    /// Fail with a solver error
    Fail,
}

/// Replays [`Step`]s in order and records the scales it was called with
#[derive(Debug, Clone, Default)]
pub struct ScriptedDetector {
    script: VecDeque<Step>,
    pub calls: Vec<SearchScale>,
}

impl ScriptedDetector {
    pub fn new(script: impl IntoIterator<Item = Step>) -> Self {
        Self {
            script: script.into_iter().collect(),
            calls: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl Detector for ScriptedDetector {
    fn detect<R: Rng>(
        &mut self,
        frame: &Frame,
        model: &AppearanceModel,
        scale: SearchScale,
        _rng: &mut R,
    ) -> Result<Detection, TrackerError> {
        self.calls.push(scale);
        match self.script.pop_front().expect("detector called more often than scripted") {
            Step::Hit(x, y) => {
                let (w, h) = model.patch_size();
                let window = Window::new(x, y, w, h);
                let patch = frame.patch(&window)?;
                Ok(Detection::Confirmed(Confirmation {
                    reported: BoundingBox::new(
                        x as f64 + REPORT_OFFSET,
                        y as f64 + REPORT_OFFSET,
                        w as f64,
                        h as f64,
                    ),
                    window,
                    patch,
                    candidate: 0,
                    exemplar: 0,
                }))
            }
            Step::Miss => Ok(Detection::Rejected(Rejection::NotLocalized)),
            Step::Fail => Err(SolverError::SingularGram { active: 3 }.into()),
        }
    }
}
