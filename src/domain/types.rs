//! Shared domain types.
//!
//! The persisted types are serializable so a seeded or fitted rate can be
//! exported to JSON and reloaded later.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A narrow resonance: energy `E_r` (MeV) and strength `ωγ` (MeV).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resonance {
    pub energy: f64,
    pub strength: f64,
}

/// Physical description of a charged-particle reaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionSpec {
    pub name: String,
    /// Atomic number of the target.
    pub z1: u32,
    /// Atomic number of the projectile.
    pub z2: u32,
    /// Reduced mass of the reactants in amu.
    pub mu_amu: f64,
    /// Best guess for S(0) in MeV b. `None` leaves the non-resonant a0 free.
    pub s_factor: Option<f64>,
    pub resonances: Vec<Resonance>,
}

/// One observed (or tabulated) rate value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    /// Temperature in GK.
    pub t9: f64,
    /// Rate in cm³ s⁻¹ mole⁻¹.
    pub rate: f64,
    /// Optional absolute 1σ uncertainty of `rate`.
    pub error: Option<f64>,
}

impl RateSample {
    pub fn new(t9: f64, rate: f64) -> Self {
        Self { t9, rate, error: None }
    }

    pub fn with_error(t9: f64, rate: f64, error: f64) -> Self {
        Self {
            t9,
            rate,
            error: Some(error),
        }
    }

    /// Weight of this sample in log space.
    ///
    /// `σ(ln r) ≈ σ / r`, so the weight is `(r / σ)²`; uniform without an error.
    pub fn log_weight(&self) -> f64 {
        match self.error {
            Some(err) if err > 0.0 => (self.rate / err).powi(2),
            _ => 1.0,
        }
    }
}

/// Summary stats about the samples actually used.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetStats {
    pub n_points: usize,
    pub t9_min: f64,
    pub t9_max: f64,
    pub rate_min: f64,
    pub rate_max: f64,
}

impl DatasetStats {
    pub fn from_samples(samples: &[RateSample]) -> Self {
        let mut stats = DatasetStats {
            n_points: samples.len(),
            t9_min: f64::INFINITY,
            t9_max: f64::NEG_INFINITY,
            rate_min: f64::INFINITY,
            rate_max: f64::NEG_INFINITY,
        };
        for s in samples {
            stats.t9_min = stats.t9_min.min(s.t9);
            stats.t9_max = stats.t9_max.max(s.t9);
            stats.rate_min = stats.rate_min.min(s.rate);
            stats.rate_max = stats.rate_max.max(s.rate);
        }
        stats
    }
}

/// Log-spaced temperature grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    pub t9_min: f64,
    pub t9_max: f64,
    pub steps: usize,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            t9_min: 0.01,
            t9_max: 10.0,
            steps: 50,
        }
    }
}

/// Resonance-energy scan request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSpec {
    pub resonance_id: usize,
    pub e_min: f64,
    pub e_max: f64,
    pub steps: usize,
}

/// `reaclib eval` configuration.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    pub reaction: ReactionSpec,
    pub grid: GridSpec,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

/// `reaclib seed` configuration.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub input: PathBuf,
    pub reaction: ReactionSpec,
    /// Let the non-resonant a0 float even though S(0) was supplied.
    pub release_s_factor: bool,
    pub scan: Option<ScanSpec>,
    /// Grid stored in the exported rate file.
    pub grid: GridSpec,
    pub export_json: Option<PathBuf>,
}

/// `reaclib synth` configuration.
#[derive(Debug, Clone)]
pub struct SynthConfig {
    pub reaction: ReactionSpec,
    pub grid: GridSpec,
    /// Relative 1σ noise applied to each sample.
    pub noise_rel: f64,
    pub seed: u64,
    pub output: PathBuf,
}

/// Fit quality diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub chi2: f64,
    /// `chi2 / (n - n_free)`, NaN when there are no degrees of freedom.
    pub reduced_chi2: f64,
    /// RMS of `ln(observed / model)`.
    pub rms_log: f64,
    pub n: usize,
    pub n_free: usize,
}

/// Physical quantities read back from the coefficients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedQuantities {
    pub s_factor: f64,
    pub reduced_mass: f64,
    pub resonances: Vec<Resonance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateGrid {
    pub t9: Vec<f64>,
    pub rate: Vec<f64>,
}

/// A saved rate file (JSON).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateFile {
    pub tool: String,
    pub name: String,
    pub z1: u32,
    pub z2: u32,
    pub mu_amu: f64,
    pub num_resonances: usize,
    pub parameters: Vec<f64>,
    pub fixed: Vec<bool>,
    pub derived: DerivedQuantities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<FitQuality>,
    pub grid: RateGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_weight_uses_relative_error() {
        let s = RateSample::with_error(1.0, 200.0, 20.0);
        assert!((s.log_weight() - 100.0).abs() < 1e-12);
        assert_eq!(RateSample::new(1.0, 5.0).log_weight(), 1.0);
        assert_eq!(RateSample::with_error(1.0, 5.0, 0.0).log_weight(), 1.0);
    }

    #[test]
    fn dataset_stats_track_ranges() {
        let samples = [
            RateSample::new(0.5, 3.0),
            RateSample::new(0.1, 1e-4),
            RateSample::new(2.0, 80.0),
        ];
        let stats = DatasetStats::from_samples(&samples);
        assert_eq!(stats.n_points, 3);
        assert_eq!(stats.t9_min, 0.1);
        assert_eq!(stats.t9_max, 2.0);
        assert_eq!(stats.rate_min, 1e-4);
        assert_eq!(stats.rate_max, 80.0);
    }
}
