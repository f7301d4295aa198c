//! Reporting utilities: per-sample residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::RateSample;
use crate::error::AppError;
use crate::models::ReaclibRate;

/// A per-sample fitted result.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResidual {
    pub sample: RateSample,
    pub model: f64,
    /// `ln(observed / model)`.
    pub log_residual: f64,
}

/// Compute model values and log residuals for each sample.
pub fn compute_residuals(samples: &[RateSample], rate: &ReaclibRate) -> Result<Vec<SampleResidual>, AppError> {
    let mut out = Vec::with_capacity(samples.len());
    for s in samples {
        let model = rate.rate(s.t9);
        if !(model.is_finite() && model > 0.0) {
            return Err(AppError::new(
                4,
                format!("Non-finite model rate at T9={} during residual computation.", s.t9),
            ));
        }
        out.push(SampleResidual {
            sample: *s,
            model,
            log_residual: (s.rate / model).ln(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compute_residuals_basic() {
        let rate = ReaclibRate::new("r", 0, 6, 1, 0.92).unwrap();
        let m = rate.rate(1.0);
        let samples = [RateSample::new(1.0, m * std::f64::consts::E)];
        let res = compute_residuals(&samples, &rate).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].model, m);
        assert!((res[0].log_residual - 1.0).abs() < 1e-12);
    }

    #[test]
    fn compute_residuals_rejects_non_finite_model() {
        let rate = ReaclibRate::new("r", 0, 6, 1, 0.92).unwrap();
        let samples = [RateSample::new(0.0, 1.0)];
        assert_eq!(compute_residuals(&samples, &rate).unwrap_err().exit_code(), 4);
    }
}
