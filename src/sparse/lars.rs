//! Greedy LARS sparse coder
//!
//! Builds the active set one atom at a time. Each iteration moves the
//! coefficients along the equiangular direction of the active atoms until an
//! inactive atom becomes equally correlated with the residual, then adds that
//! atom.

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::common::constants::GRAM_RIDGE;
use crate::common::errors::SolverError;
use crate::common::linalg::{argmax_abs, sign};

/// Stopping rules for [`lars`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LarsParams {
    /// Stop once the residual norm falls to this value
    pub tolerance: f64,
    /// Maximum number of iterations (and so of coefficient steps)
    pub max_iterations: usize,
}

impl Default for LarsParams {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            max_iterations: 20,
        }
    }
}

/// Output of one [`lars`] solve
#[derive(Debug, Clone)]
pub struct LarsSolution {
    /// Coefficient per dictionary column
    pub coefficients: DVector<f64>,
    /// Active atoms in the order they were selected
    pub active: Vec<usize>,
    /// Coefficient steps taken
    pub iterations: usize,
    /// Norm of `y - X * coefficients`
    pub residual_norm: f64,
}

/// Equiangular direction of the sign-adjusted active atoms
struct Direction {
    /// `A = (1' G^-1 1)^(-1/2)`
    normalizer: f64,
    /// Per-atom weights `w = A G^-1 1`
    weights: DVector<f64>,
    /// Unit direction `u = Xa w`
    unit: DVector<f64>,
}

/// `None` when the direction degenerates: `1' G^-1 1` is not a positive
/// finite number, or the weights are not finite. Near-duplicate active atoms
/// do this once the ridge no longer dominates rounding error.
fn equiangular(x: &DMatrix<f64>, active: &[usize], signs: &[f64]) -> Result<Option<Direction>, SolverError> {
    let k = active.len();
    let xa = DMatrix::from_fn(x.nrows(), k, |r, c| x[(r, active[c])] * signs[c]);
    let gram = xa.tr_mul(&xa) + DMatrix::identity(k, k) * GRAM_RIDGE;
    let gram_inv = gram
        .try_inverse()
        .ok_or(SolverError::SingularGram { active: k })?;

    let g1 = gram_inv * DVector::from_element(k, 1.0);
    let total = g1.sum();
    if !(total > 0.0) || !total.is_finite() {
        log::trace!("equiangular normalizer 1'G^-1 1 = {} for {} atoms", total, k);
        return Ok(None);
    }
    let normalizer = total.powf(-0.5);
    let weights = g1 * normalizer;
    if weights.iter().any(|w| !w.is_finite()) {
        return Ok(None);
    }
    let unit = &xa * &weights;

    Ok(Some(Direction {
        normalizer,
        weights,
        unit,
    }))
}

/// Smallest positive step at which an inactive atom ties the active
/// correlation, with the atom producing it
///
/// Atoms are scanned in column order and the `(C - c_j)/(A - a_j)` candidate
/// before `(C + c_j)/(A + a_j)`; only strictly smaller steps replace the
/// current best, so ties keep the first.
fn next_step(
    correlation: &DVector<f64>,
    alignment: &DVector<f64>,
    is_active: &[bool],
    big_c: f64,
    normalizer: f64,
) -> Option<(f64, usize)> {
    let mut best: Option<(f64, usize)> = None;
    for j in (0..correlation.len()).filter(|&j| !is_active[j]) {
        let c = correlation[j];
        let a = alignment[j];
        for gamma in [(big_c - c) / (normalizer - a), (big_c + c) / (normalizer + a)] {
            if gamma > 0.0 && gamma.is_finite() && best.map_or(true, |(g, _)| gamma < g) {
                best = Some((gamma, j));
            }
        }
    }
    best
}

/// Solve `x * beta ≈ y` for a sparse `beta`
///
/// `x` columns are expected to be unit-norm. The first active atom is the one
/// most correlated with `y` (first in column order on ties). The loop ends
/// after `params.max_iterations` steps, once the residual norm reaches
/// `params.tolerance`, or with a final least-squares step once every atom is
/// active or no inactive atom can join.
///
/// When the equiangular direction of the active set degenerates, or a step
/// would leave the coefficients non-finite, the path ends there and the
/// coefficients reached so far are returned.
///
/// # Errors
/// [`SolverError::SingularGram`] if an active Gram matrix cannot be inverted
/// even with the ridge term, [`SolverError::NumericalInstability`] if `y` or
/// `x` holds non-finite values.
pub fn lars(y: &DVector<f64>, x: &DMatrix<f64>, params: &LarsParams) -> Result<LarsSolution, SolverError> {
    let (m, n) = x.shape();
    if y.len() != m {
        return Err(SolverError::DimensionMismatch {
            expected: m,
            actual: y.len(),
            context: "target length".to_string(),
        });
    }
    if n == 0 {
        return Err(SolverError::EmptyDictionary);
    }
    if y.iter().chain(x.iter()).any(|v| !v.is_finite()) {
        return Err(SolverError::NumericalInstability {
            description: "non-finite LARS input".to_string(),
        });
    }

    let mut beta = DVector::zeros(n);
    let mut residual = y.clone();
    let mut correlation = x.tr_mul(&residual);

    let mut active = Vec::with_capacity(params.max_iterations.min(n) + 1);
    let mut is_active = vec![false; n];
    match argmax_abs(&correlation) {
        Some((j, c)) if c > 0.0 => {
            active.push(j);
            is_active[j] = true;
        }
        // y is orthogonal to every atom
        _ => {
            let residual_norm = residual.norm();
            return Ok(LarsSolution {
                coefficients: beta,
                active,
                iterations: 0,
                residual_norm,
            });
        }
    }

    let mut iterations = 0;
    while iterations < params.max_iterations && residual.norm() > params.tolerance {
        let signs: Vec<f64> = active.iter().map(|&j| sign(correlation[j])).collect();
        let dir = match equiangular(x, &active, &signs)? {
            Some(dir) => dir,
            None => break,
        };
        let big_c = correlation[active[0]] * signs[0];

        let step = if active.len() == n {
            None
        } else {
            let alignment = x.tr_mul(&dir.unit);
            next_step(&correlation, &alignment, &is_active, big_c, dir.normalizer)
        };

        let (gamma, joining) = match step {
            Some((gamma, j)) => (gamma, Some(j)),
            // Least-squares step over the active atoms
            None => (residual.dot(&dir.unit), None),
        };

        let mut next = beta.clone();
        for (k, &j) in active.iter().enumerate() {
            next[j] += gamma * signs[k] * dir.weights[k];
        }
        if next.iter().any(|v| !v.is_finite()) {
            break;
        }
        beta = next;
        residual = y - x * &beta;
        iterations += 1;

        match joining {
            Some(j) => {
                correlation = x.tr_mul(&residual);
                active.push(j);
                is_active[j] = true;
            }
            None => break,
        }
    }

    let residual_norm = residual.norm();
    Ok(LarsSolution {
        coefficients: beta,
        active,
        iterations,
        residual_norm,
    })
}
