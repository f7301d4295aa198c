//! Read/write rate files (JSON).
//!
//! A rate file is the portable representation of a seeded or fitted rate:
//! - reaction topology (charges, reduced mass, resonance count)
//! - the full coefficient vector and fixed mask
//! - physical quantities read back from the coefficients
//! - optional fit quality and a precomputed rate grid
//!
//! The schema is defined by `domain::RateFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{DerivedQuantities, FitQuality, GridSpec, RateFile, RateGrid};
use crate::error::{AppError, RateError};
use crate::math::log_space;
use crate::models::ReaclibRate;

const TOOL_NAME: &str = "reaclib";

/// Snapshot a rate, evaluating it on `grid`.
pub fn build_rate_file(
    rate: &ReaclibRate,
    quality: Option<FitQuality>,
    grid: &GridSpec,
) -> Result<RateFile, RateError> {
    let t9 = log_space(grid.t9_min, grid.t9_max, grid.steps)?;
    let values = rate.evaluate_many(&t9);
    let (z1, z2) = rate.charges();
    Ok(RateFile {
        tool: TOOL_NAME.to_string(),
        name: rate.name().to_string(),
        z1,
        z2,
        mu_amu: rate.mu_amu(),
        num_resonances: rate.num_resonances(),
        parameters: rate.parameters().to_vec(),
        fixed: rate.fixed_mask().to_vec(),
        derived: DerivedQuantities {
            s_factor: rate.s_factor(),
            reduced_mass: rate.reduced_mass(),
            resonances: rate.resonances(),
        },
        quality,
        grid: RateGrid { t9, rate: values },
    })
}

/// Rebuild the model stored in a rate file.
pub fn rate_from_file(file: &RateFile) -> Result<ReaclibRate, RateError> {
    ReaclibRate::new(file.name.clone(), file.num_resonances, file.z1, file.z2, file.mu_amu)?
        .with_parameters(file.parameters.clone(), file.fixed.clone())
}

pub fn write_rate_json(path: &Path, file: &RateFile) -> Result<(), AppError> {
    let out = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create rate JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(out, file)
        .map_err(|e| AppError::new(2, format!("Failed to write rate JSON: {e}")))?;
    log::info!("wrote rate '{}' to '{}'", file.name, path.display());
    Ok(())
}

pub fn read_rate_json(path: &Path) -> Result<RateFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open rate JSON '{}': {e}", path.display())))?;
    let rate: RateFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid rate JSON: {e}")))?;
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate() -> ReaclibRate {
        let mut r = ReaclibRate::new("12C(p,g)13N", 1, 6, 1, 0.92).unwrap();
        r.set_s_factor(1.4e-3);
        r.set_resonance(0, 0.422, 9.0e-3).unwrap();
        r.set_parameter(3, 0.1).unwrap();
        r
    }

    #[test]
    fn build_rate_file_snapshots_model() {
        let r = rate();
        let grid = GridSpec {
            t9_min: 0.1,
            t9_max: 1.0,
            steps: 5,
        };
        let file = build_rate_file(&r, None, &grid).unwrap();
        assert_eq!(file.tool, "reaclib");
        assert_eq!(file.parameters.len(), 14);
        assert_eq!(file.grid.t9.len(), 5);
        assert_eq!(file.grid.rate[4], r.rate(1.0));
        assert_eq!(file.derived.resonances.len(), 1);
        assert!((file.derived.s_factor - 1.4e-3).abs() < 1e-15);
    }

    #[test]
    fn rate_file_json_round_trip_restores_model() {
        let r = rate();
        let file = build_rate_file(&r, None, &GridSpec::default()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rate.json");
        write_rate_json(&path, &file).unwrap();
        let loaded = read_rate_json(&path).unwrap();
        assert_eq!(loaded, file);

        let restored = rate_from_file(&loaded).unwrap();
        assert_eq!(restored, r);
    }

    #[test]
    fn rate_from_file_rejects_inconsistent_parameters() {
        let mut file = build_rate_file(&rate(), None, &GridSpec::default()).unwrap();
        file.parameters.pop();
        assert!(matches!(
            rate_from_file(&file),
            Err(RateError::ParameterLength { expected: 14, actual: 13 })
        ));
    }

    #[test]
    fn invalid_json_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(read_rate_json(&path).unwrap_err().exit_code(), 2);
    }
}
