//! Randomized-projection ensemble over [`lars`]
//!
//! Every round draws a Gaussian projection, compresses the targets and the
//! dictionary with it and codes each target independently. Each coding casts
//! one ballot for its dominant atom and the most-voted atom wins.

use std::borrow::Cow;

use nalgebra::{DMatrix, DVector};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::common::errors::SolverError;
use crate::common::linalg::{argmax_abs, normalize_columns};
use crate::common::rng::{gaussian_matrix, SimpleRng};

use super::lars::{lars, LarsParams};

/// Parameters of the ensemble solver
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Residual norm at which a single coding stops
    pub tolerance: f64,
    /// Iteration cap of a single coding
    pub max_active: usize,
    /// Compression ratio `m / cp`; values `<= 1` disable the projection
    pub compression_ratio: f64,
    /// Number of independent projection rounds
    pub repetitions: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            max_active: 20,
            compression_ratio: 30.0,
            repetitions: 3,
        }
    }
}

impl SolverConfig {
    pub fn lars_params(&self) -> LarsParams {
        LarsParams {
            tolerance: self.tolerance,
            max_iterations: self.max_active,
        }
    }

    /// Rows kept by the projection for `m`-dimensional inputs, `None` when
    /// the inputs are used as they are
    pub fn projected_rows(&self, m: usize) -> Option<usize> {
        if self.compression_ratio <= 1.0 {
            None
        } else {
            Some(((m as f64 / self.compression_ratio).round() as usize).max(1))
        }
    }
}

/// Outcome of one ensemble solve
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleVote {
    /// Winning dictionary column, `None` when no column won
    pub winner: Option<usize>,
    /// Votes per column; the extra last bin counts abstentions
    pub tally: Vec<usize>,
    /// Ballot of every `(round, target)` pair, round-major
    pub ballots: Vec<usize>,
}

/// Majority-vote sparse coder over random projections
#[derive(Debug, Clone, Default)]
pub struct EnsembleSolver {
    config: SolverConfig,
}

impl EnsembleSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Find the dictionary column that best explains `targets`
    ///
    /// Targets and dictionary are column-normalized first. One `u64` is drawn
    /// from `rng` and each round derives its own generator from it, so the
    /// result depends only on the caller's stream and not on scheduling.
    pub fn solve<R: Rng>(
        &self,
        targets: &DMatrix<f64>,
        dictionary: &DMatrix<f64>,
        rng: &mut R,
    ) -> Result<EnsembleVote, SolverError> {
        let (m, n) = dictionary.shape();
        if n == 0 {
            return Err(SolverError::EmptyDictionary);
        }
        if targets.nrows() != m {
            return Err(SolverError::DimensionMismatch {
                expected: m,
                actual: targets.nrows(),
                context: "target rows".to_string(),
            });
        }
        if targets.ncols() == 0 {
            return Err(SolverError::DimensionMismatch {
                expected: 1,
                actual: 0,
                context: "target columns".to_string(),
            });
        }

        let targets = normalize_columns(targets);
        let dictionary = normalize_columns(dictionary);
        let base_seed = rng.next_u64();

        let ballots = self.collect_ballots(base_seed, &targets, &dictionary)?;
        let (winner, tally) = tally_votes(&ballots, n);
        log::trace!("ensemble tally over {} ballots: winner {:?}", ballots.len(), winner);

        Ok(EnsembleVote {
            winner,
            tally,
            ballots,
        })
    }

    #[cfg(feature = "rayon")]
    fn collect_ballots(
        &self,
        base_seed: u64,
        targets: &DMatrix<f64>,
        dictionary: &DMatrix<f64>,
    ) -> Result<Vec<usize>, SolverError> {
        let rounds: Vec<Vec<usize>> = (0..self.config.repetitions)
            .into_par_iter()
            .map(|round| {
                let (t, d) = self.project(base_seed, round, targets, dictionary);
                (0..t.ncols())
                    .into_par_iter()
                    .map(|j| self.ballot(&t.column(j).into_owned(), &d))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<_, _>>()?;
        Ok(rounds.into_iter().flatten().collect())
    }

    #[cfg(not(feature = "rayon"))]
    fn collect_ballots(
        &self,
        base_seed: u64,
        targets: &DMatrix<f64>,
        dictionary: &DMatrix<f64>,
    ) -> Result<Vec<usize>, SolverError> {
        let mut ballots = Vec::with_capacity(self.config.repetitions * targets.ncols());
        for round in 0..self.config.repetitions {
            let (t, d) = self.project(base_seed, round, targets, dictionary);
            for j in 0..t.ncols() {
                ballots.push(self.ballot(&t.column(j).into_owned(), &d)?);
            }
        }
        Ok(ballots)
    }

    fn project<'a>(
        &self,
        base_seed: u64,
        round: usize,
        targets: &'a DMatrix<f64>,
        dictionary: &'a DMatrix<f64>,
    ) -> (Cow<'a, DMatrix<f64>>, Cow<'a, DMatrix<f64>>) {
        match self.config.projected_rows(dictionary.nrows()) {
            Some(cp) => {
                let mut rng = SimpleRng::for_stream(base_seed, round);
                let projection = gaussian_matrix(&mut rng, cp, dictionary.nrows(), (cp as f64).sqrt().recip());
                (
                    Cow::Owned(&projection * targets),
                    Cow::Owned(&projection * dictionary),
                )
            }
            None => (Cow::Borrowed(targets), Cow::Borrowed(dictionary)),
        }
    }

    /// Dominant atom of one coding, `dictionary.ncols()` to abstain
    fn ballot(&self, target: &DVector<f64>, dictionary: &DMatrix<f64>) -> Result<usize, SolverError> {
        let n = dictionary.ncols();
        let solution = lars(target, dictionary, &self.config.lars_params())?;
        if solution.coefficients.iter().any(|v| !v.is_finite()) {
            return Ok(n);
        }
        Ok(match argmax_abs(&solution.coefficients) {
            Some((j, magnitude)) if magnitude > 0.0 => j,
            _ => n,
        })
    }
}

/// Count ballots into `n + 1` bins and pick the winner
///
/// The most-voted bin wins, lowest index on ties. The abstention bin `n` (or
/// no ballots at all) means no winner.
pub fn tally_votes(ballots: &[usize], n: usize) -> (Option<usize>, Vec<usize>) {
    let mut tally = vec![0usize; n + 1];
    for &b in ballots {
        tally[b.min(n)] += 1;
    }
    let mut best = 0;
    for (i, &count) in tally.iter().enumerate() {
        if count > tally[best] {
            best = i;
        }
    }
    let winner = if tally[best] == 0 || best >= n { None } else { Some(best) };
    (winner, tally)
}
