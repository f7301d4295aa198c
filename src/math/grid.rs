//! Log-spaced grids.
//!
//! Reaction rates span many orders of magnitude over a few decades of
//! temperature, so evaluation grids and energy scans are log-spaced.

use crate::error::RateError;

/// Generate `steps` log-spaced points between `min` and `max` (inclusive).
///
/// A single step yields `[min]`.
pub fn log_space(min: f64, max: f64, steps: usize) -> Result<Vec<f64>, RateError> {
    if !(min.is_finite() && max.is_finite() && min > 0.0 && max >= min) {
        return Err(RateError::InvalidArgument(format!(
            "invalid grid range: min={min}, max={max} (must be finite, >0, and max>=min)"
        )));
    }
    if steps == 0 {
        return Err(RateError::InvalidArgument("grid steps must be >= 1".into()));
    }
    if max == min {
        return Ok(vec![min; steps]);
    }
    if steps == 1 {
        return Ok(vec![min]);
    }

    let ln_min = min.ln();
    let ln_max = max.ln();
    let step = (ln_max - ln_min) / (steps as f64 - 1.0);

    let mut out = Vec::with_capacity(steps);
    for i in 0..steps {
        out.push((ln_min + step * i as f64).exp());
    }
    // Pin the upper endpoint exactly.
    out[steps - 1] = max;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_space_includes_endpoints() {
        let v = log_space(0.01, 10.0, 7).unwrap();
        assert_eq!(v.len(), 7);
        assert!((v[0] - 0.01).abs() < 1e-15);
        assert_eq!(v[6], 10.0);
        assert!((v[3] - 10.0_f64.powf(-0.5)).abs() < 1e-12);
    }

    #[test]
    fn log_space_is_increasing() {
        let v = log_space(0.05, 5.0, 30).unwrap();
        assert!(v.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn log_space_rejects_bad_ranges() {
        assert!(log_space(0.0, 1.0, 5).is_err());
        assert!(log_space(2.0, 1.0, 5).is_err());
        assert!(log_space(0.1, f64::INFINITY, 5).is_err());
        assert!(log_space(0.1, 1.0, 0).is_err());
    }

    #[test]
    fn log_space_degenerate_range() {
        assert_eq!(log_space(0.3, 0.3, 4).unwrap(), vec![0.3; 4]);
        assert_eq!(log_space(0.3, 2.0, 1).unwrap(), vec![0.3]);
    }
}
