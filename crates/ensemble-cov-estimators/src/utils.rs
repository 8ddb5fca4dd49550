//! Matrix helpers shared by the estimators
//!
//! Centring of observation matrices, plus the symmetry and positive
//! semi-definiteness checks used to validate estimated covariance matrices
//! before they are handed to downstream dimensionality reduction.

use super::CovarianceError;
use ndarray::{Array1, Array2, Axis};

/// Result of a symmetric eigenvalue decomposition
#[derive(Debug, Clone)]
pub struct EigenDecomposition {
    /// Eigenvalues (sorted in descending order)
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors (columns are eigenvectors)
    pub eigenvectors: Array2<f64>,
}

/// Subtract a centring point from every row of `observations`.
///
/// With `centre = None` the column-wise mean is used. Fails when the centre
/// length differs from the column count or when there are no rows to average.
pub fn center(
    observations: &Array2<f64>,
    centre: Option<&Array1<f64>>,
) -> Result<Array2<f64>, CovarianceError> {
    let (n_frames, n_dims) = observations.dim();

    if let Some(centre) = centre {
        if centre.len() != n_dims {
            return Err(CovarianceError::DimensionMismatch {
                expected: n_dims,
                actual: centre.len(),
            });
        }
        return Ok(observations - &centre.view().insert_axis(Axis(0)));
    }

    let mean = observations
        .mean_axis(Axis(0))
        .ok_or(CovarianceError::InsufficientData {
            required: 1,
            actual: n_frames,
        })?;
    Ok(observations - &mean.insert_axis(Axis(0)))
}

/// Check that a matrix is square and `|m[i][j] - m[j][i]| <= tolerance`
pub fn is_symmetric(matrix: &Array2<f64>, tolerance: f64) -> bool {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return false;
    }

    (0..n).all(|i| ((i + 1)..n).all(|j| (matrix[[i, j]] - matrix[[j, i]]).abs() <= tolerance))
}

/// Check positive semi-definiteness of a symmetric matrix.
///
/// Every eigenvalue must be at least `-tolerance * max(1, |λ|max)`. The
/// tolerance is absolute for matrices with eigenvalues of order one and
/// relative to the largest eigenvalue otherwise, so round-off in
/// rank-deficient sample covariances (more dimensions than frames) is not
/// mistaken for indefiniteness.
pub fn is_positive_semidefinite(matrix: &Array2<f64>, tolerance: f64) -> bool {
    if !is_symmetric(matrix, tolerance.max(f64::EPSILON)) {
        return false;
    }

    match jacobi_eigendecomp(matrix, 100, 1e-14) {
        Ok(decomp) => {
            let scale = decomp
                .eigenvalues
                .iter()
                .fold(1.0_f64, |acc, v| acc.max(v.abs()));
            decomp.eigenvalues.iter().all(|&v| v >= -tolerance * scale)
        }
        Err(_) => false,
    }
}

/// Cyclic Jacobi eigenvalue decomposition for symmetric matrices
///
/// Each sweep annihilates every off-diagonal pair once; iteration stops
/// when the off-diagonal Frobenius norm drops below `tolerance` relative to
/// the total norm, or after `max_sweeps` sweeps.
///
/// # Arguments
/// * `matrix` - Symmetric matrix to decompose
/// * `max_sweeps` - Maximum number of full sweeps
/// * `tolerance` - Relative convergence threshold for the off-diagonal norm
///
/// # Returns
/// * Eigenvalues (descending) and matching eigenvectors
pub fn jacobi_eigendecomp(
    matrix: &Array2<f64>,
    max_sweeps: usize,
    tolerance: f64,
) -> Result<EigenDecomposition, CovarianceError> {
    let n = matrix.nrows();
    if n != matrix.ncols() {
        return Err(CovarianceError::DimensionMismatch {
            expected: n,
            actual: matrix.ncols(),
        });
    }

    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);
    let total_norm = a.iter().map(|x| x * x).sum::<f64>().sqrt();

    for _sweep in 0..max_sweeps {
        if off_diagonal_norm(&a) <= tolerance * total_norm.max(f64::MIN_POSITIVE) {
            break;
        }

        for p in 0..n {
            for q in (p + 1)..n {
                if a[[p, q]] != 0.0 {
                    rotate(&mut a, &mut v, p, q);
                }
            }
        }
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| a[[j, j]].total_cmp(&a[[i, i]]));

    let eigenvalues = order.iter().map(|&i| a[[i, i]]).collect();
    let mut eigenvectors = Array2::<f64>::zeros((n, n));
    for (column, &source) in order.iter().enumerate() {
        eigenvectors.column_mut(column).assign(&v.column(source));
    }

    Ok(EigenDecomposition {
        eigenvalues,
        eigenvectors,
    })
}

fn off_diagonal_norm(a: &Array2<f64>) -> f64 {
    a.indexed_iter()
        .filter(|((i, j), _)| i != j)
        .map(|(_, x)| x * x)
        .sum::<f64>()
        .sqrt()
}

/// Zero `a[p][q]` with a single Givens rotation, accumulating it into `v`
fn rotate(a: &mut Array2<f64>, v: &mut Array2<f64>, p: usize, q: usize) {
    let n = a.nrows();
    let (app, aqq, apq) = (a[[p, p]], a[[q, q]], a[[p, q]]);

    let theta = (aqq - app) / (2.0 * apq);
    let t = theta.signum() / (theta.abs() + theta.mul_add(theta, 1.0).sqrt());
    let c = 1.0 / t.mul_add(t, 1.0).sqrt();
    let s = t * c;

    for k in 0..n {
        let akp = a[[k, p]];
        let akq = a[[k, q]];
        a[[k, p]] = c * akp - s * akq;
        a[[k, q]] = s * akp + c * akq;
    }
    for k in 0..n {
        let apk = a[[p, k]];
        let aqk = a[[q, k]];
        a[[p, k]] = c * apk - s * aqk;
        a[[q, k]] = s * apk + c * aqk;
    }
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    for k in 0..n {
        let vkp = v[[k, p]];
        let vkq = v[[k, q]];
        v[[k, p]] = c * vkp - s * vkq;
        v[[k, q]] = s * vkp + c * vkq;
    }
}
