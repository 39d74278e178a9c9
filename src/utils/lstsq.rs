//! Weighted linear least squares for small design matrices.
//!
//! Used to fit the best sinusoid (plus optional offset) at a single
//! frequency when evaluating a periodogram model.

use crate::error::{PeriodicityError, Result};

/// Fit `y ≈ X @ beta` minimizing `sum(w * (y - X @ beta)^2)`.
///
/// `columns` holds the design matrix column by column, each of length n.
/// Solves the normal equations with a Cholesky decomposition.
pub fn weighted_lstsq(columns: &[Vec<f64>], y: &[f64], weights: &[f64]) -> Result<Vec<f64>> {
    let n = y.len();
    if n == 0 {
        return Err(PeriodicityError::InsufficientData { needed: 1, got: 0 });
    }
    if weights.len() != n {
        return Err(PeriodicityError::DimensionMismatch {
            expected: n,
            got: weights.len(),
        });
    }
    for col in columns {
        if col.len() != n {
            return Err(PeriodicityError::DimensionMismatch {
                expected: n,
                got: col.len(),
            });
        }
    }

    let k = columns.len();
    // Lower triangle of X' W X, row-packed
    let mut gram = vec![0.0; k * (k + 1) / 2];
    let mut rhs = vec![0.0; k];

    for (obs, (&w, &yo)) in weights.iter().zip(y.iter()).enumerate() {
        for i in 0..k {
            let wxi = w * columns[i][obs];
            rhs[i] += wxi * yo;
            for j in 0..=i {
                gram[packed(i, j)] += wxi * columns[j][obs];
            }
        }
    }

    // Ridge keeps the zero-frequency design solvable
    for i in 0..k {
        gram[packed(i, i)] += RIDGE;
    }

    if !cholesky_solve_packed(&mut gram, &mut rhs) {
        return Err(PeriodicityError::ComputationError(
            "least squares failed: normal matrix not positive definite".into(),
        ));
    }
    Ok(rhs)
}

/// Diagonal load added to the normal matrix.
const RIDGE: f64 = 1e-12;

/// Offset of element `(i, j)`, `j <= i`, in a row-packed lower triangle.
#[inline]
fn packed(i: usize, j: usize) -> usize {
    i * (i + 1) / 2 + j
}

/// Solve `A x = b` in place for symmetric positive definite `A` given as a
/// row-packed lower triangle.
///
/// On success `a` holds the factor `L` with `A = L L'` and `b` holds `x`.
/// Returns false when a pivot is not positive.
fn cholesky_solve_packed(a: &mut [f64], b: &mut [f64]) -> bool {
    let k = b.len();

    for i in 0..k {
        for j in 0..=i {
            let dot: f64 = (0..j).map(|m| a[packed(i, m)] * a[packed(j, m)]).sum();
            let v = a[packed(i, j)] - dot;
            if i == j {
                if v <= 0.0 || !v.is_finite() {
                    return false;
                }
                a[packed(i, i)] = v.sqrt();
            } else {
                a[packed(i, j)] = v / a[packed(j, j)];
            }
        }
    }

    // L z = b
    for i in 0..k {
        let dot: f64 = (0..i).map(|m| a[packed(i, m)] * b[m]).sum();
        b[i] = (b[i] - dot) / a[packed(i, i)];
    }
    // L' x = z
    for i in (0..k).rev() {
        let dot: f64 = (i + 1..k).map(|m| a[packed(m, i)] * b[m]).sum();
        b[i] = (b[i] - dot) / a[packed(i, i)];
    }
    true
}
