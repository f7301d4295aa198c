//! Shared workflows behind the `reaclib` subcommands.
//!
//! Each function runs one workflow end to end and returns its outputs; the
//! caller decides what to print or export:
//! - eval: physical inputs -> model -> rate grid
//! - seed: samples CSV -> model -> optional energy scan -> linearized seeding -> quality
//! - synth: physical inputs -> model -> noisy samples

use crate::data::generate_samples;
use crate::domain::{EvalConfig, FitQuality, RateSample, SeedConfig, SynthConfig};
use crate::error::AppError;
use crate::fit::{BlockSeed, ScanResult, fit_quality, scan_resonance_energy, seed_block};
use crate::io::ingest::{IngestedSamples, load_samples};
use crate::math::log_space;
use crate::models::ReaclibRate;
use crate::report::{SampleResidual, compute_residuals};

/// Outputs of `reaclib eval`.
#[derive(Debug, Clone)]
pub struct EvalOutput {
    pub rate: ReaclibRate,
    pub t9: Vec<f64>,
    pub values: Vec<f64>,
}

/// Outputs of `reaclib seed`.
#[derive(Debug, Clone)]
pub struct SeedOutput {
    pub ingest: IngestedSamples,
    pub rate: ReaclibRate,
    pub scan: Option<ScanResult>,
    pub seed: BlockSeed,
    pub quality: FitQuality,
    pub residuals: Vec<SampleResidual>,
}

pub fn run_eval(config: &EvalConfig) -> Result<EvalOutput, AppError> {
    let rate = ReaclibRate::from_spec(&config.reaction)?;
    let t9 = log_space(config.grid.t9_min, config.grid.t9_max, config.grid.steps)?;
    let values = rate.evaluate_many(&t9);
    Ok(EvalOutput { rate, t9, values })
}

pub fn run_seed(config: &SeedConfig) -> Result<SeedOutput, AppError> {
    let ingest = load_samples(&config.input)?;
    seed_samples(config, ingest)
}

/// Seeding workflow on samples that are already loaded.
pub fn seed_samples(config: &SeedConfig, ingest: IngestedSamples) -> Result<SeedOutput, AppError> {
    let mut rate = ReaclibRate::from_spec(&config.reaction)?;
    if config.release_s_factor {
        rate.release_parameter(0)?;
    }

    let scan = match &config.scan {
        Some(spec) => {
            let energies = log_space(spec.e_min, spec.e_max, spec.steps)?;
            let result = scan_resonance_energy(&rate, &ingest.samples, spec.resonance_id, &energies)?;
            log::info!(
                "resonance {}: best energy {:.6} MeV (chi2={:.6e})",
                spec.resonance_id,
                result.best_energy,
                result.best_chi2
            );
            rate = result.best.clone();
            Some(result)
        }
        None => None,
    };

    let seed = seed_block(&mut rate, &ingest.samples, 0)?;
    let quality = quality_of(&rate, &ingest.samples);
    let residuals = compute_residuals(&ingest.samples, &rate)?;

    Ok(SeedOutput {
        ingest,
        rate,
        scan,
        seed,
        quality,
        residuals,
    })
}

/// Returns the model and its generated samples.
pub fn run_synth(config: &SynthConfig) -> Result<(ReaclibRate, Vec<RateSample>), AppError> {
    let rate = ReaclibRate::from_spec(&config.reaction)?;
    let samples = generate_samples(&rate, &config.grid, config.noise_rel, config.seed)?;
    Ok((rate, samples))
}

fn quality_of(rate: &ReaclibRate, samples: &[RateSample]) -> FitQuality {
    fit_quality(rate, samples, rate.parameters())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DatasetStats, GridSpec, ReactionSpec, Resonance, ScanSpec};
    use approx::assert_relative_eq;

    fn reaction(s_factor: Option<f64>) -> ReactionSpec {
        ReactionSpec {
            name: "12C(p,g)13N".into(),
            z1: 6,
            z2: 1,
            mu_amu: 0.92,
            s_factor,
            resonances: vec![Resonance {
                energy: 0.422,
                strength: 9.0e-3,
            }],
        }
    }

    fn ingested(samples: Vec<RateSample>) -> IngestedSamples {
        let n = samples.len();
        IngestedSamples {
            stats: DatasetStats::from_samples(&samples),
            samples,
            row_errors: Vec::new(),
            rows_read: n,
            rows_used: n,
        }
    }

    fn seed_config(reaction: ReactionSpec, scan: Option<ScanSpec>) -> SeedConfig {
        SeedConfig {
            input: "unused.csv".into(),
            reaction,
            release_s_factor: false,
            scan,
            grid: GridSpec::default(),
            export_json: None,
        }
    }

    #[test]
    fn eval_produces_grid_of_positive_rates() {
        let out = run_eval(&EvalConfig {
            reaction: reaction(Some(1.4e-3)),
            grid: GridSpec {
                t9_min: 0.05,
                t9_max: 5.0,
                steps: 12,
            },
            export_csv: None,
            export_json: None,
        })
        .unwrap();
        assert_eq!(out.t9.len(), 12);
        assert_eq!(out.values.len(), 12);
        assert!(out.values.iter().all(|v| v.is_finite() && *v > 0.0));
        assert_eq!(out.values[0], out.rate.rate(out.t9[0]));
    }

    #[test]
    fn seed_recovers_s_factor_from_synthetic_samples() {
        let (truth, samples) = run_synth(&SynthConfig {
            reaction: reaction(Some(1.4e-3)),
            grid: GridSpec {
                t9_min: 0.01,
                t9_max: 0.1,
                steps: 30,
            },
            noise_rel: 0.0,
            seed: 1,
            output: "unused.csv".into(),
        })
        .unwrap();

        let out = seed_samples(&seed_config(reaction(None), None), ingested(samples)).unwrap();
        assert!(out.scan.is_none());
        assert_eq!(out.seed.block, 0);
        assert_relative_eq!(out.rate.s_factor(), truth.s_factor(), max_relative = 1e-5);
        assert!(out.quality.rms_log < 1e-6);
        assert_eq!(out.residuals.len(), 30);
    }

    #[test]
    fn seed_with_scan_places_resonance_near_truth() {
        let (_, samples) = run_synth(&SynthConfig {
            reaction: reaction(Some(1.4e-3)),
            grid: GridSpec {
                t9_min: 0.05,
                t9_max: 2.0,
                steps: 40,
            },
            noise_rel: 0.0,
            seed: 1,
            output: "unused.csv".into(),
        })
        .unwrap();

        let mut start = reaction(None);
        start.resonances[0].energy = 1.0;
        let scan = ScanSpec {
            resonance_id: 0,
            e_min: 0.1,
            e_max: 1.5,
            steps: 60,
        };
        let out = seed_samples(&seed_config(start, Some(scan)), ingested(samples)).unwrap();
        let best = out.scan.as_ref().unwrap().best_energy;
        assert!((best - 0.422).abs() < 0.05, "best energy {best}");
        assert_relative_eq!(out.rate.resonance_energy(0), best, max_relative = 1e-12);
    }

    #[test]
    fn invalid_reaction_maps_to_usage_error() {
        let mut bad = reaction(None);
        bad.z1 = 0;
        let err = seed_samples(
            &seed_config(bad, None),
            ingested(vec![RateSample::new(1.0, 1.0)]),
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
