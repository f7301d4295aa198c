//! Formatted terminal output.
//!
//! Formatting lives in one place so the model and fitting code stay free of
//! presentation concerns.

use crate::domain::FitQuality;
use crate::fit::ScanResult;
use crate::io::ingest::IngestedSamples;
use crate::models::{PARAMS_PER_TERM, ReaclibRate};
use crate::report::SampleResidual;

/// Coefficients per term (free values marked `*`) plus the physical read-back.
pub fn format_rate_summary(rate: &ReaclibRate) -> String {
    let mut out = String::new();
    let (z1, z2) = rate.charges();

    out.push_str(&format!("=== reaclib - {} ===\n", rate.name()));
    out.push_str(&format!(
        "Reactants: Z1={z1} Z2={z2} | mu={:.6} amu | resonances={}\n",
        rate.mu_amu(),
        rate.num_resonances()
    ));

    out.push_str("\nCoefficients (* = free):\n");
    out.push_str(
        format!(
            "{:<14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}\n",
            "term", "a0", "a1", "a2", "a3", "a4", "a5", "a6"
        )
        .trim_end(),
    );
    out.push('\n');
    for block in 0..rate.num_blocks() {
        let label = if block == 0 {
            "nonresonant".to_string()
        } else {
            format!("resonance {}", block - 1)
        };
        out.push_str(&format!("{label:<14}"));
        let base = PARAMS_PER_TERM * block;
        for (j, a) in rate.block(block).iter().enumerate() {
            let mark = if rate.fixed_mask()[base + j] { ' ' } else { '*' };
            out.push_str(&format!(" {:>13}{mark}", format!("{a:.6e}")));
        }
        let trimmed = out.trim_end().len();
        out.truncate(trimmed);
        out.push('\n');
    }

    out.push_str("\nPhysical quantities:\n");
    out.push_str(&format!("- S(0)         : {:.6e} MeV b\n", rate.s_factor()));
    out.push_str(&format!("- reduced mass : {:.6} amu\n", rate.reduced_mass()));
    for (id, res) in rate.resonances().iter().enumerate() {
        out.push_str(&format!(
            "- resonance {id}  : E_r={:.6} MeV, wg={:.6e} MeV\n",
            res.energy, res.strength
        ));
    }

    out
}

pub fn format_quality(q: &FitQuality) -> String {
    format!(
        "Fit quality: n={} free={} | chi2={:.6e} | chi2/dof={:.6e} | rms(ln)={:.6e}\n",
        q.n, q.n_free, q.chi2, q.reduced_chi2, q.rms_log
    )
}

pub fn format_ingest(ingested: &IngestedSamples) -> String {
    let s = &ingested.stats;
    let mut out = format!(
        "Samples: used {} of {} rows | T9=[{:.4}, {:.4}] | rate=[{:.4e}, {:.4e}]\n",
        ingested.rows_used, ingested.rows_read, s.t9_min, s.t9_max, s.rate_min, s.rate_max
    );
    for e in &ingested.row_errors {
        out.push_str(&format!("  skipped line {}: {}\n", e.line, e.message));
    }
    out
}

/// Two-column `T9 | rate` table.
pub fn format_rate_table(t9s: &[f64], rates: &[f64]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>12} {:>16}\n", "T9", "rate"));
    out.push_str(&format!("{:-<12} {:-<16}\n", "", ""));
    for (t9, r) in t9s.iter().zip(rates) {
        out.push_str(&format!("{t9:>12.5} {:>16}\n", format!("{r:.6e}")));
    }
    out
}

pub fn format_residuals(rows: &[SampleResidual]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>12} {:>14} {:>14} {:>12}\n",
        "T9", "observed", "model", "ln(obs/mod)"
    ));
    out.push_str(&format!("{:-<12} {:-<14} {:-<14} {:-<12}\n", "", "", "", ""));
    for r in rows {
        out.push_str(&format!(
            "{:>12.5} {:>14} {:>14} {:>12.4}\n",
            r.sample.t9,
            format!("{:.5e}", r.sample.rate),
            format!("{:.5e}", r.model),
            r.log_residual
        ));
    }
    out
}

pub fn format_scan(id: usize, scan: &ScanResult) -> String {
    let mut out = format!(
        "Energy scan, resonance {id}: best E_r={:.6} MeV (chi2={:.6e}, {} candidates)\n",
        scan.best_energy,
        scan.best_chi2,
        scan.points.len()
    );
    for p in &scan.points {
        let mark = if p.energy == scan.best_energy { " <" } else { "" };
        out.push_str(&format!("  E_r={:>10.6}  chi2={:.6e}{mark}\n", p.energy, p.chi2));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_lists_every_term_and_marks_free_coefficients() {
        let mut rate = ReaclibRate::new("12C(p,g)13N", 2, 6, 1, 0.92).unwrap();
        rate.set_resonance(0, 0.422, 9.0e-3).unwrap();
        let text = format_rate_summary(&rate);
        assert!(text.contains("12C(p,g)13N"));
        assert!(text.contains("nonresonant"));
        assert!(text.contains("resonance 1"));
        assert!(text.contains("E_r=0.422000"));
        // a0 of the non-resonant term is free until S(0) is set.
        let nonres = text.lines().find(|l| l.starts_with("nonresonant")).unwrap();
        assert_eq!(nonres.matches('*').count(), 4);
    }

    #[test]
    fn rate_table_has_header_and_rows() {
        let text = format_rate_table(&[0.1, 1.0], &[1.5e-5, 2.0e2]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].contains("1.500000e-5"));
    }
}
