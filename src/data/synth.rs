//! Synthetic rate samples.
//!
//! Samples are drawn on a log-spaced T9 grid from a known rate with
//! multiplicative log-normal noise:
//!
//! ```text
//! rate_obs = rate_true * exp(σ z - σ²/2),   z ~ N(0, 1)
//! ```
//!
//! The `-σ²/2` correction keeps the expected value equal to the true rate.
//! Each sample carries `σ · rate_true` as its absolute error. The generator is
//! seeded, so the same inputs always produce the same samples.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

use crate::domain::{GridSpec, RateSample};
use crate::error::RateError;
use crate::math::log_space;
use crate::models::ReaclibRate;

pub fn generate_samples(
    rate: &ReaclibRate,
    grid: &GridSpec,
    noise_rel: f64,
    seed: u64,
) -> Result<Vec<RateSample>, RateError> {
    if !(noise_rel.is_finite() && noise_rel >= 0.0) {
        return Err(RateError::InvalidArgument(format!(
            "relative noise must be finite and >= 0 (got {noise_rel})"
        )));
    }
    let t9s = log_space(grid.t9_min, grid.t9_max, grid.steps)?;

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0, 1.0)
        .map_err(|e| RateError::InvalidArgument(format!("noise distribution error: {e}")))?;
    let correction = 0.5 * noise_rel * noise_rel;

    let samples = t9s
        .into_iter()
        .map(|t9| {
            let truth = rate.rate(t9);
            if noise_rel == 0.0 {
                return RateSample::new(t9, truth);
            }
            let z: f64 = normal.sample(&mut rng);
            let observed = truth * (noise_rel * z - correction).exp();
            RateSample::with_error(t9, observed, noise_rel * truth)
        })
        .collect();
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> ReaclibRate {
        let mut r = ReaclibRate::new("12C(p,g)", 1, 6, 1, 0.92).unwrap();
        r.set_s_factor(1.4e-3);
        r.set_resonance(0, 0.422, 9.0e-3).unwrap();
        r
    }

    #[test]
    fn noiseless_samples_are_exact() {
        let r = rate();
        let grid = GridSpec {
            t9_min: 0.05,
            t9_max: 5.0,
            steps: 10,
        };
        let samples = generate_samples(&r, &grid, 0.0, 1).unwrap();
        assert_eq!(samples.len(), 10);
        for s in &samples {
            assert_eq!(s.rate, r.rate(s.t9));
            assert!(s.error.is_none());
        }
    }

    #[test]
    fn noisy_samples_are_deterministic_and_close() {
        let r = rate();
        let grid = GridSpec::default();
        let a = generate_samples(&r, &grid, 0.05, 42).unwrap();
        let b = generate_samples(&r, &grid, 0.05, 42).unwrap();
        assert_eq!(a, b);
        let c = generate_samples(&r, &grid, 0.05, 43).unwrap();
        assert_ne!(a, c);

        for s in &a {
            let truth = r.rate(s.t9);
            // |z| < 6 with overwhelming probability for 50 draws.
            assert!((s.rate / truth).ln().abs() < 0.35, "t9={} ratio={}", s.t9, s.rate / truth);
            assert!((s.error.unwrap() - 0.05 * truth).abs() <= 1e-12 * truth);
        }
    }

    #[test]
    fn negative_noise_is_rejected() {
        assert!(generate_samples(&rate(), &GridSpec::default(), -0.1, 0).is_err());
    }
}
