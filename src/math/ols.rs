//! Weighted least squares solver.
//!
//! Seeding a REACLIB term reduces to small linear problems of the form
//!
//! ```text
//! minimize Σ w_i (y_i - x_i^T a)^2
//! ```
//!
//! where `y_i` is a log-rate and `x_i` the temperature basis restricted to the
//! free coefficients. Rows are scaled by `sqrt(w_i)` by the caller and the
//! resulting ordinary least squares problem is solved by SVD, which handles
//! tall, nearly collinear design matrices (the T9 powers are strongly
//! correlated over narrow temperature ranges).

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(coeffs) = svd.solve(y, tol) {
            if coeffs.iter().all(|v| v.is_finite()) {
                return Some(coeffs);
            }
        }
    }

    None
}
