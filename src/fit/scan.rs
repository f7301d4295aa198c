//! Resonance-energy grid scan.
//!
//! The resonance energy enters the rate through `exp(-11.6045 E_r / T9)` and
//! is the coefficient most prone to local minima. We scan a deterministic grid
//! of energies instead: for each candidate the resonance is placed at that
//! energy (keeping its strength), the non-resonant term is re-seeded around it
//! and the chi-square is recorded. Candidates are independent and evaluated in
//! parallel.

use rayon::prelude::*;

use crate::domain::RateSample;
use crate::error::RateError;
use crate::fit::adapter::chi_square;
use crate::fit::seed::seed_block;
use crate::models::ReaclibRate;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    pub energy: f64,
    pub chi2: f64,
}

#[derive(Debug, Clone)]
pub struct ScanResult {
    /// Model at the best energy, non-resonant term re-seeded.
    pub best: ReaclibRate,
    pub best_energy: f64,
    pub best_chi2: f64,
    /// Every candidate that produced a finite chi-square, in grid order.
    pub points: Vec<ScanPoint>,
}

#[derive(Debug, Clone)]
struct Candidate {
    idx: usize,
    rate: ReaclibRate,
    energy: f64,
    chi2: f64,
}

/// Scan resonance `id` over `energies` (MeV).
pub fn scan_resonance_energy(
    rate: &ReaclibRate,
    samples: &[RateSample],
    id: usize,
    energies: &[f64],
) -> Result<ScanResult, RateError> {
    if energies.is_empty() {
        return Err(RateError::InvalidArgument("energy grid is empty".into()));
    }
    let strength = rate.resonance_strength(id);
    if strength < 0.0 {
        return Err(RateError::ResonanceOutOfRange {
            id,
            num_resonances: rate.num_resonances(),
        });
    }

    let outcomes: Vec<Result<Candidate, RateError>> = energies
        .par_iter()
        .enumerate()
        .map(|(idx, &energy)| {
            let mut trial = rate.clone();
            trial.set_resonance(id, energy, strength)?;
            seed_block(&mut trial, samples, 0)?;
            let chi2 = chi_square(&trial, samples, trial.parameters());
            Ok(Candidate {
                idx,
                rate: trial,
                energy,
                chi2,
            })
        })
        .collect();

    let mut first_err = None;
    let mut candidates = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        match outcome {
            Ok(c) if c.chi2.is_finite() => candidates.push(c),
            Ok(c) => log::debug!("scan: E={} gave non-finite chi2", c.energy),
            Err(e) => {
                log::debug!("scan: candidate rejected: {e}");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }

    // Deterministic selection: minimum chi2, ties broken by grid index.
    let Some(best) = candidates
        .iter()
        .min_by(|a, b| a.chi2.total_cmp(&b.chi2).then(a.idx.cmp(&b.idx)))
    else {
        return Err(first_err.unwrap_or_else(|| {
            RateError::InvalidArgument("no energy on the grid gave a finite chi-square".into())
        }));
    };

    log::info!(
        "scan of resonance {id}: best E={:.6} MeV (chi2={:.6e}) over {} candidates",
        best.energy,
        best.chi2,
        candidates.len()
    );

    Ok(ScanResult {
        best: best.rate.clone(),
        best_energy: best.energy,
        best_chi2: best.chi2,
        points: candidates
            .iter()
            .map(|c| ScanPoint {
                energy: c.energy,
                chi2: c.chi2,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn truth() -> ReaclibRate {
        let mut r = ReaclibRate::new("12C(p,g)", 1, 6, 1, 0.92).unwrap();
        r.set_s_factor(1.4e-3);
        r.set_resonance(0, 0.4, 9.0e-3).unwrap();
        r
    }

    fn samples(r: &ReaclibRate) -> Vec<RateSample> {
        crate::math::log_space(0.02, 8.0, 30)
            .unwrap()
            .into_iter()
            .map(|t9| RateSample::new(t9, r.rate(t9)))
            .collect()
    }

    #[test]
    fn scan_picks_true_energy_from_grid() {
        let truth = truth();
        let data = samples(&truth);

        let mut start = ReaclibRate::new("12C(p,g)", 1, 6, 1, 0.92).unwrap();
        start.set_s_factor(1.4e-3);
        start.set_resonance(0, 1.0, 9.0e-3).unwrap();

        let grid = [0.1, 0.2, 0.4, 0.8, 1.6];
        let result = scan_resonance_energy(&start, &data, 0, &grid).unwrap();
        assert_eq!(result.best_energy, 0.4);
        // Energies far below the truth overshoot the data and fail to seed.
        assert!(result.points.len() <= grid.len());
        assert!(result.points.iter().any(|p| p.energy == 0.4));
        assert!(result.points.iter().all(|p| p.chi2 >= result.best_chi2));
        assert!(result.best_chi2 < 1e-12);
        assert_relative_eq!(result.best.resonance_energy(0), 0.4, max_relative = 1e-12);
        assert_relative_eq!(result.best.resonance_strength(0), 9.0e-3, max_relative = 1e-12);
    }

    #[test]
    fn scan_rejects_bad_requests() {
        let r = truth();
        let data = samples(&r);
        assert!(matches!(
            scan_resonance_energy(&r, &data, 0, &[]),
            Err(RateError::InvalidArgument(_))
        ));
        assert!(matches!(
            scan_resonance_energy(&r, &data, 1, &[0.4]),
            Err(RateError::ResonanceOutOfRange { id: 1, .. })
        ));
    }

    #[test]
    fn scan_reports_seed_failure_when_no_candidate_survives() {
        let r = truth();
        let data = samples(&r);
        let err = scan_resonance_energy(&r, &data[..2], 0, &[0.2, 0.4]).unwrap_err();
        assert!(matches!(err, RateError::InsufficientData { .. }));
    }
}
