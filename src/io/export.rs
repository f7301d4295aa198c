//! CSV exports.
//!
//! - rate tables (`t9, rate, term_0..term_N`) for spreadsheets and plotting tools
//! - rate samples in the same schema `ingest` reads back

use std::path::Path;

use crate::domain::RateSample;
use crate::error::AppError;
use crate::models::ReaclibRate;

/// Write the total rate and each term's contribution on `t9s`.
pub fn write_rate_table_csv(path: &Path, rate: &ReaclibRate, t9s: &[f64]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec!["t9".to_string(), "rate".to_string(), "nonresonant".to_string()];
    header.extend((0..rate.num_resonances()).map(|id| format!("resonance_{id}")));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for &t9 in t9s {
        let terms = rate.term_rates(t9);
        let mut row = vec![format!("{t9:.6e}"), format!("{:.6e}", terms.iter().sum::<f64>())];
        row.extend(terms.iter().map(|v| format!("{v:.6e}")));
        writer
            .write_record(&row)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

/// Write samples as `t9,rate,error`.
pub fn write_samples_csv(path: &Path, samples: &[RateSample]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create samples CSV '{}': {e}", path.display())))?;

    writer
        .write_record(["t9", "rate", "error"])
        .map_err(|e| AppError::new(2, format!("Failed to write samples CSV header: {e}")))?;
    for s in samples {
        let error = s.error.map(|v| format!("{v:e}")).unwrap_or_default();
        writer
            .write_record([format!("{:e}", s.t9), format!("{:e}", s.rate), error])
            .map_err(|e| AppError::new(2, format!("Failed to write samples CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush samples CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::ingest::load_samples;

    #[test]
    fn rate_table_has_one_column_per_term() {
        let mut rate = ReaclibRate::new("r", 2, 6, 1, 0.92).unwrap();
        rate.set_s_factor(1.4e-3);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        write_rate_table_csv(&path, &rate, &[0.1, 1.0]).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "t9,rate,nonresonant,resonance_0,resonance_1");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].split(',').count(), 5);
    }

    #[test]
    fn samples_round_trip_through_ingest() {
        let samples = vec![
            RateSample::with_error(0.1, 1.25e-5, 1.0e-6),
            RateSample::new(0.5, 3.5),
        ];
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("samples.csv");
        write_samples_csv(&path, &samples).unwrap();

        let ingested = load_samples(&path).unwrap();
        assert_eq!(ingested.samples, samples);
    }
}
