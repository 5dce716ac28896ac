//! Linear algebra utilities
//!
//! Column normalization and the small selection helpers shared by the
//! sparse solvers.

use nalgebra::{DMatrix, DVector};

use super::constants::ZERO_NORM;

/// Scale every column of `matrix` to unit L2 norm
///
/// Columns whose norm is effectively zero are left as they are rather than
/// divided into NaNs.
pub fn normalize_columns(matrix: &DMatrix<f64>) -> DMatrix<f64> {
    let mut out = matrix.clone();
    for mut col in out.column_iter_mut() {
        let norm_sq = col.norm_squared();
        if norm_sq > ZERO_NORM {
            col /= norm_sq.sqrt();
        }
    }
    out
}

/// Sign of `v` with `sign(0) = 0`
#[inline]
pub fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Index and value of the largest `|v|`, first index on ties
///
/// Returns `None` for an empty vector.
pub fn argmax_abs(values: &DVector<f64>) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.iter().enumerate() {
        let a = v.abs();
        match best {
            Some((_, b)) if a <= b => {}
            _ => best = Some((i, a)),
        }
    }
    best
}

/// Gather columns `indices` of `matrix` into a new matrix
pub fn select_columns(matrix: &DMatrix<f64>, indices: &[usize]) -> DMatrix<f64> {
    DMatrix::from_fn(matrix.nrows(), indices.len(), |r, c| matrix[(r, indices[c])])
}

/// Horizontal concatenation `[left | right]`
pub fn hconcat(left: &DMatrix<f64>, right: &DMatrix<f64>) -> DMatrix<f64> {
    debug_assert_eq!(left.nrows(), right.nrows());
    let split = left.ncols();
    DMatrix::from_fn(left.nrows(), split + right.ncols(), |r, c| {
        if c < split {
            left[(r, c)]
        } else {
            right[(r, c - split)]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_columns_unit_norm() {
        let m = DMatrix::from_column_slice(2, 2, &[3.0, 4.0, 0.0, 2.0]);
        let n = normalize_columns(&m);
        assert!((n.column(0).norm() - 1.0).abs() < 1e-12);
        assert!((n.column(1).norm() - 1.0).abs() < 1e-12);
        assert!((n[(0, 0)] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_columns_keeps_zero_column() {
        let m = DMatrix::from_column_slice(2, 2, &[0.0, 0.0, 1.0, 1.0]);
        let n = normalize_columns(&m);
        assert_eq!(n[(0, 0)], 0.0);
        assert_eq!(n[(1, 0)], 0.0);
        assert!(n.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_argmax_abs_first_on_ties() {
        let v = DVector::from_vec(vec![0.5, -2.0, 2.0, 1.0]);
        assert_eq!(argmax_abs(&v), Some((1, 2.0)));
        assert_eq!(argmax_abs(&DVector::zeros(0)), None);
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.0), 1.0);
        assert_eq!(sign(-0.1), -1.0);
        assert_eq!(sign(0.0), 0.0);
    }

    #[test]
    fn test_hconcat_and_select() {
        let a = DMatrix::from_column_slice(2, 1, &[1.0, 2.0]);
        let b = DMatrix::from_column_slice(2, 2, &[3.0, 4.0, 5.0, 6.0]);
        let c = hconcat(&a, &b);
        assert_eq!(c.ncols(), 3);
        assert_eq!(c[(1, 2)], 6.0);

        let s = select_columns(&c, &[2, 0]);
        assert_eq!(s[(0, 0)], 5.0);
        assert_eq!(s[(1, 1)], 2.0);
    }
}
