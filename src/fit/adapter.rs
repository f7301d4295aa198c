//! Binding between the rate model and an external least-squares engine.
//!
//! An engine needs a model function `f(x, params)`, a starting vector and a
//! fixed mask. `FitFunction` is that seam; `objective` turns any implementor
//! into a closure over the free parameters only.
//!
//! Residuals are taken in log space, `ln(observed) - ln(model)`, because rates
//! span many decades. With an absolute error σ the sample weight is `(r/σ)²`
//! (see [`RateSample::log_weight`]), so the chi-square approximates the usual
//! `Σ ((obs - model) / σ)²` near the optimum.

use rayon::prelude::*;

use crate::domain::{FitQuality, RateSample};
use crate::fit::free::FreeParameters;
use crate::models::ReaclibRate;

pub trait FitFunction: Sync {
    fn n_params(&self) -> usize;

    /// Starting values; fixed entries keep these values throughout a fit.
    fn initial_parameters(&self) -> &[f64];

    /// `true` marks a coefficient held constant.
    fn fixed_mask(&self) -> &[bool];

    fn eval(&self, x: f64, params: &[f64]) -> f64;
}

impl FitFunction for ReaclibRate {
    fn n_params(&self) -> usize {
        ReaclibRate::n_params(self)
    }

    fn initial_parameters(&self) -> &[f64] {
        self.parameters()
    }

    fn fixed_mask(&self) -> &[bool] {
        ReaclibRate::fixed_mask(self)
    }

    fn eval(&self, x: f64, params: &[f64]) -> f64 {
        self.evaluate(x, params)
    }
}

/// `ln(observed) - ln(model)` for one sample.
pub fn log_residual<F: FitFunction + ?Sized>(f: &F, sample: &RateSample, params: &[f64]) -> f64 {
    sample.rate.ln() - f.eval(sample.t9, params).ln()
}

pub fn residuals<F: FitFunction + ?Sized>(f: &F, samples: &[RateSample], params: &[f64]) -> Vec<f64> {
    samples
        .par_iter()
        .map(|s| log_residual(f, s, params))
        .collect()
}

/// Weighted log-space chi-square.
///
/// NaN if the model is non-positive or not finite at any sample.
pub fn chi_square<F: FitFunction + ?Sized>(f: &F, samples: &[RateSample], params: &[f64]) -> f64 {
    samples
        .par_iter()
        .map(|s| {
            let r = log_residual(f, s, params);
            s.log_weight() * r * r
        })
        .sum()
}

/// Chi-square as a function of the free parameters only.
///
/// Fixed entries come from `f.initial_parameters()` at the time of the call.
/// A vector of the wrong length evaluates to NaN.
pub fn objective<'a, F: FitFunction + ?Sized>(
    f: &'a F,
    samples: &'a [RateSample],
) -> impl Fn(&[f64]) -> f64 + 'a {
    let free = FreeParameters::from_mask(f.fixed_mask());
    let base = f.initial_parameters().to_vec();
    move |values: &[f64]| {
        let mut full = base.clone();
        match free.unpack(values, &mut full) {
            Ok(()) => chi_square(f, samples, &full),
            Err(_) => f64::NAN,
        }
    }
}

pub fn fit_quality<F: FitFunction + ?Sized>(f: &F, samples: &[RateSample], params: &[f64]) -> FitQuality {
    let n = samples.len();
    let n_free = f.fixed_mask().iter().filter(|fixed| !**fixed).count();
    let chi2 = chi_square(f, samples, params);
    let dof = n.saturating_sub(n_free);
    let reduced_chi2 = if dof > 0 { chi2 / dof as f64 } else { f64::NAN };
    let rms_log = if n > 0 {
        let ss: f64 = residuals(f, samples, params).iter().map(|r| r * r).sum();
        (ss / n as f64).sqrt()
    } else {
        f64::NAN
    };
    FitQuality {
        chi2,
        reduced_chi2,
        rms_log,
        n,
        n_free,
    }
}
