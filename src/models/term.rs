//! Pure evaluation of the REACLIB expansion.
//!
//! Each term contributes
//!
//! ```text
//! exp[ a0 + Σ_{j=1..5} a_j · T9^((2j-5)/3) + a6 · ln T9 ]
//! ```
//!
//! and the rate is the sum over terms. The temperature basis is the same for
//! every term, so it is computed once per `t9` and kept on the stack.
//!
//! `t9 > 0` is a precondition. For `t9 <= 0` the logarithm and the negative
//! powers are not finite and the result is NaN or infinite; nothing panics.

use crate::models::constants::PARAMS_PER_TERM;

/// Temperature basis `[1, T9^-1, T9^-1/3, T9^1/3, T9, T9^5/3, ln T9]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct T9Basis {
    row: [f64; PARAMS_PER_TERM],
}

impl T9Basis {
    pub fn new(t9: f64) -> Self {
        let mut row = [1.0; PARAMS_PER_TERM];
        for j in 1..=5 {
            row[j] = t9.powf((2.0 * j as f64 - 5.0) / 3.0);
        }
        row[6] = t9.ln();
        Self { row }
    }

    /// Basis value multiplying coefficient `a_j`.
    pub fn get(&self, j: usize) -> f64 {
        self.row[j]
    }

    pub fn row(&self) -> &[f64; PARAMS_PER_TERM] {
        &self.row
    }

    /// Exponent of a single term with coefficients `a0..a6`.
    ///
    /// # Panics
    /// Panics if `coeffs` has fewer than 7 entries.
    pub fn exponent(&self, coeffs: &[f64]) -> f64 {
        self.row
            .iter()
            .zip(&coeffs[..PARAMS_PER_TERM])
            .map(|(b, a)| a * b)
            .sum()
    }
}

/// Rate at `t9` for a full parameter vector (7 coefficients per term).
///
/// A trailing partial block is ignored; callers size the vector with
/// [`crate::models::ReaclibRate::n_params`].
pub fn evaluate(t9: f64, params: &[f64]) -> f64 {
    let basis = T9Basis::new(t9);
    params
        .chunks_exact(PARAMS_PER_TERM)
        .map(|coeffs| basis.exponent(coeffs).exp())
        .sum()
}

/// Per-term contributions at `t9`, in block order.
pub fn term_rates(t9: f64, params: &[f64]) -> Vec<f64> {
    let basis = T9Basis::new(t9);
    params
        .chunks_exact(PARAMS_PER_TERM)
        .map(|coeffs| basis.exponent(coeffs).exp())
        .collect()
}
