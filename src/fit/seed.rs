//! Linearized seeding of a single REACLIB term.
//!
//! With every other term held at its current coefficients, the remainder
//! `r_k(T9) = rate(T9) - Σ_{m≠k} term_m(T9)` of term `k` satisfies
//!
//! ```text
//! ln r_k = a0 + Σ_{j=1..5} a_j T9^((2j-5)/3) + a6 ln T9
//! ```
//!
//! which is linear in the coefficients. Fixed coefficients are moved to the
//! left-hand side and the free ones are solved by weighted least squares. This
//! gives a nonlinear fitter a starting point close to the optimum; it is not a
//! fit of the full sum.

use nalgebra::{DMatrix, DVector};

use crate::domain::RateSample;
use crate::error::RateError;
use crate::math::solve_least_squares;
use crate::models::{PARAMS_PER_TERM, ReaclibRate, T9Basis};

/// Remainders below this fraction of the observed rate are dominated by
/// rounding in the subtraction and are skipped.
const MIN_REMAINDER_FRACTION: f64 = 1e-6;

/// Outcome of seeding one term.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockSeed {
    pub block: usize,
    /// Full-vector indices that were updated.
    pub indices: Vec<usize>,
    pub values: Vec<f64>,
    /// Samples with a positive remainder that entered the solve.
    pub used: usize,
}

/// Seed the free coefficients of term `block` from `samples`.
///
/// Samples where the other terms already account for (nearly) all of the
/// observed rate carry no information about this term and are skipped. The
/// free coefficients stay free after seeding.
pub fn seed_block(rate: &mut ReaclibRate, samples: &[RateSample], block: usize) -> Result<BlockSeed, RateError> {
    if block >= rate.num_blocks() {
        return Err(RateError::InvalidArgument(format!(
            "term {block} does not exist, the rate has {} term(s)",
            rate.num_blocks()
        )));
    }

    let base = PARAMS_PER_TERM * block;
    let fixed = &rate.fixed_mask()[base..base + PARAMS_PER_TERM];
    let free_j: Vec<usize> = (0..PARAMS_PER_TERM).filter(|&j| !fixed[j]).collect();
    if free_j.is_empty() {
        log::debug!("term {block} of '{}' has no free coefficients", rate.name());
        return Ok(BlockSeed {
            block,
            indices: Vec::new(),
            values: Vec::new(),
            used: 0,
        });
    }

    let coeffs = rate.block(block).to_vec();
    let mut rows: Vec<f64> = Vec::with_capacity(samples.len() * free_j.len());
    let mut ys: Vec<f64> = Vec::with_capacity(samples.len());

    for s in samples {
        if !(s.t9.is_finite() && s.t9 > 0.0 && s.rate.is_finite() && s.rate > 0.0) {
            continue;
        }
        let basis = T9Basis::new(s.t9);
        let others: f64 = (0..rate.num_blocks())
            .filter(|&k| k != block)
            .map(|k| basis.exponent(rate.block(k)).exp())
            .sum();
        let remainder = s.rate - others;
        if !(remainder.is_finite() && remainder > s.rate * MIN_REMAINDER_FRACTION) {
            continue;
        }

        let known: f64 = (0..PARAMS_PER_TERM)
            .filter(|&j| fixed[j])
            .map(|j| coeffs[j] * basis.get(j))
            .sum();
        let weight = match s.error {
            Some(err) if err > 0.0 => (remainder / err).powi(2),
            _ => 1.0,
        };
        let sw = weight.sqrt();

        rows.extend(free_j.iter().map(|&j| basis.get(j) * sw));
        ys.push((remainder.ln() - known) * sw);
    }

    let used = ys.len();
    if used <= free_j.len() {
        return Err(RateError::InsufficientData {
            usable: used,
            required: free_j.len(),
        });
    }

    let x = DMatrix::from_row_slice(used, free_j.len(), &rows);
    let y = DVector::from_vec(ys);
    let solution = solve_least_squares(&x, &y).ok_or(RateError::SingularSystem)?;

    let indices: Vec<usize> = free_j.iter().map(|&j| base + j).collect();
    let values: Vec<f64> = solution.iter().copied().collect();
    for (&i, &v) in indices.iter().zip(&values) {
        rate.set_parameter(i, v)?;
    }
    log::info!(
        "seeded term {block} of '{}' from {used} samples: {:?}",
        rate.name(),
        values
    );

    Ok(BlockSeed {
        block,
        indices,
        values,
        used,
    })
}
