//! The REACLIB rate model.
//!
//! A rate is a sum of 7-coefficient terms: block 0 is the non-resonant
//! charged-particle term, blocks `1..=num_resonances` are narrow resonances in
//! registration order. The model seeds coefficients from physical inputs,
//! tracks which coefficients a fitter may vary, and reads the physical
//! quantities back out of (fitted) coefficients.
//!
//! Non-resonant term:
//! - `a0 = ln[B (Z1 Z2 μ)^(1/3) S(0)]`, free until an S-factor is known
//! - `a1 = 0`, `a2 = -4.2486 (Z1² Z2² μ)^(1/3)`, `a6 = -2/3`, all fixed
//! - `a3..a5` always free
//!
//! Narrow resonance:
//! - `a0 = ln[D μ^(-3/2) ωγ]`, `a1 = -11.6045 E_r`, free until the resonance is set
//! - `a2..a5 = 0`, `a6 = -3/2`, fixed
//!
//! Resonance ids are zero-based and address block `id + 1` everywhere.
//!
//! Neutron-induced non-resonant terms are not supported: both charges must be
//! at least 1.

use rayon::prelude::*;

use crate::domain::{ReactionSpec, Resonance};
use crate::error::RateError;
use crate::models::constants::*;
use crate::models::term;

#[derive(Debug, Clone, PartialEq)]
pub struct ReaclibRate {
    name: String,
    num_resonances: usize,
    z1: u32,
    z2: u32,
    mu_amu: f64,
    parameters: Vec<f64>,
    fixed: Vec<bool>,
}

impl ReaclibRate {
    /// Charged-particle rate with `num_resonances` narrow resonances.
    ///
    /// `z1`, `z2` are the reactant atomic numbers and `mu_amu` their reduced
    /// mass in amu.
    pub fn new(
        name: impl Into<String>,
        num_resonances: usize,
        z1: u32,
        z2: u32,
        mu_amu: f64,
    ) -> Result<Self, RateError> {
        if z1 == 0 || z2 == 0 {
            return Err(RateError::InvalidArgument(format!(
                "charges must be >= 1 (got z1={z1}, z2={z2}); neutron-induced rates are not supported"
            )));
        }
        if !(mu_amu.is_finite() && mu_amu > 0.0) {
            return Err(RateError::InvalidArgument(format!(
                "reduced mass must be finite and > 0 (got {mu_amu})"
            )));
        }

        let n = PARAMS_PER_TERM * (num_resonances + 1);
        let mut rate = Self {
            name: name.into(),
            num_resonances,
            z1,
            z2,
            mu_amu,
            parameters: vec![0.0; n],
            fixed: vec![false; n],
        };

        let zz = rate.charge_product();
        rate.parameters[0] = (B_NONRESONANT * (zz * mu_amu).cbrt()).ln();
        rate.fix(1, 0.0);
        rate.fix(2, A2_COULOMB * (zz * zz * mu_amu).cbrt());
        rate.fix(6, A6_NONRESONANT);

        let a0_resonant = (D_RESONANT * mu_amu.powf(-1.5)).ln();
        for id in 0..num_resonances {
            let base = Self::block_offset(id);
            rate.parameters[base] = a0_resonant;
            rate.parameters[base + 1] = A1_RESONANCE;
            for j in 2..=5 {
                rate.fix(base + j, 0.0);
            }
            rate.fix(base + 6, A6_RESONANT);
        }

        Ok(rate)
    }

    /// Build a rate and apply the optional S-factor and all resonances of `spec`.
    pub fn from_spec(spec: &ReactionSpec) -> Result<Self, RateError> {
        let mut rate = Self::new(
            spec.name.clone(),
            spec.resonances.len(),
            spec.z1,
            spec.z2,
            spec.mu_amu,
        )?;
        if let Some(s0) = spec.s_factor {
            rate.set_s_factor(s0);
        }
        for (id, res) in spec.resonances.iter().enumerate() {
            rate.set_resonance(id, res.energy, res.strength)?;
        }
        Ok(rate)
    }

    /// Replace coefficients and fixed flags, e.g. when restoring a saved fit.
    pub fn with_parameters(mut self, parameters: Vec<f64>, fixed: Vec<bool>) -> Result<Self, RateError> {
        let expected = self.n_params();
        for actual in [parameters.len(), fixed.len()] {
            if actual != expected {
                return Err(RateError::ParameterLength { expected, actual });
            }
        }
        self.parameters = parameters;
        self.fixed = fixed;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_resonances(&self) -> usize {
        self.num_resonances
    }

    /// Number of terms, the non-resonant one included.
    pub fn num_blocks(&self) -> usize {
        self.num_resonances + 1
    }

    pub fn n_params(&self) -> usize {
        self.parameters.len()
    }

    pub fn charges(&self) -> (u32, u32) {
        (self.z1, self.z2)
    }

    /// Reduced mass given at construction (see [`Self::reduced_mass`] for the fitted one).
    pub fn mu_amu(&self) -> f64 {
        self.mu_amu
    }

    pub fn parameters(&self) -> &[f64] {
        &self.parameters
    }

    pub fn fixed_mask(&self) -> &[bool] {
        &self.fixed
    }

    /// Coefficients `a0..a6` of one term.
    ///
    /// # Panics
    /// Panics if `block >= self.num_blocks()`.
    pub fn block(&self, block: usize) -> &[f64] {
        let base = PARAMS_PER_TERM * block;
        &self.parameters[base..base + PARAMS_PER_TERM]
    }

    pub fn parameter(&self, index: usize) -> Result<f64, RateError> {
        self.check_index(index)?;
        Ok(self.parameters[index])
    }

    pub fn is_fixed(&self, index: usize) -> Result<bool, RateError> {
        self.check_index(index)?;
        Ok(self.fixed[index])
    }

    /// Set a starting value and leave the coefficient free.
    pub fn set_parameter(&mut self, index: usize, value: f64) -> Result<(), RateError> {
        self.check_index(index)?;
        self.parameters[index] = value;
        self.fixed[index] = false;
        Ok(())
    }

    /// Hold a coefficient constant at `value`.
    pub fn fix_parameter(&mut self, index: usize, value: f64) -> Result<(), RateError> {
        self.check_index(index)?;
        self.fix(index, value);
        Ok(())
    }

    /// Let the fitter vary a coefficient around its current value.
    pub fn release_parameter(&mut self, index: usize) -> Result<(), RateError> {
        self.check_index(index)?;
        self.fixed[index] = false;
        Ok(())
    }

    /// Write fitted values back into the free coefficients, in index order.
    pub fn apply_free(&mut self, free: &[f64]) -> Result<(), RateError> {
        let expected = self.fixed.iter().filter(|f| !**f).count();
        if free.len() != expected {
            return Err(RateError::ParameterLength {
                expected,
                actual: free.len(),
            });
        }
        let slots = self
            .parameters
            .iter_mut()
            .zip(&self.fixed)
            .filter_map(|(p, fixed)| (!fixed).then_some(p));
        for (slot, &value) in slots.zip(free) {
            *slot = value;
        }
        Ok(())
    }

    /// Fix the non-resonant a0 from the S-factor at zero energy, in MeV b.
    pub fn set_s_factor(&mut self, s0_mevb: f64) {
        let a0 = (B_NONRESONANT * (self.charge_product() * self.mu_amu).cbrt() * s0_mevb).ln();
        self.fix(0, a0);
    }

    /// Fix a0/a1 of resonance `id` from its energy (MeV) and strength ωγ (MeV).
    ///
    /// An out-of-range id leaves the model untouched and returns
    /// [`RateError::ResonanceOutOfRange`].
    pub fn set_resonance(&mut self, id: usize, energy_mev: f64, strength: f64) -> Result<(), RateError> {
        self.check_resonance(id)?;
        let base = Self::block_offset(id);
        self.fix(base, (D_RESONANT * self.mu_amu.powf(-1.5) * strength).ln());
        self.fix(base + 1, A1_RESONANCE * energy_mev);
        Ok(())
    }

    /// Rate at `t9` for an arbitrary parameter snapshot.
    ///
    /// Only the parameter count of `params` matters, not this model's own values.
    pub fn evaluate(&self, t9: f64, params: &[f64]) -> f64 {
        term::evaluate(t9, params)
    }

    /// Rate at `t9` using the current coefficients.
    pub fn rate(&self, t9: f64) -> f64 {
        term::evaluate(t9, &self.parameters)
    }

    /// Rates at many temperatures, computed in parallel.
    pub fn evaluate_many(&self, t9s: &[f64]) -> Vec<f64> {
        t9s.par_iter().map(|&t9| self.rate(t9)).collect()
    }

    /// Contribution of each term at `t9`, non-resonant first.
    pub fn term_rates(&self, t9: f64) -> Vec<f64> {
        term::term_rates(t9, &self.parameters)
    }

    /// Reduced mass recovered from the non-resonant a2, holding the charges fixed.
    pub fn reduced_mass(&self) -> f64 {
        let zz = self.charge_product();
        (self.parameters[2] / A2_COULOMB).powi(3) / (zz * zz)
    }

    /// S(0) in MeV b recovered from the non-resonant a0.
    pub fn s_factor(&self) -> f64 {
        let mu = self.reduced_mass();
        self.parameters[0].exp() / B_NONRESONANT / (self.charge_product() * mu).cbrt()
    }

    /// Resonance energy in MeV, `-1` for an invalid id.
    pub fn resonance_energy(&self, id: usize) -> f64 {
        if self.check_resonance(id).is_err() {
            return -1.0;
        }
        self.parameters[Self::block_offset(id) + 1] / A1_RESONANCE
    }

    /// Resonance strength ωγ, `-1` for an invalid id.
    pub fn resonance_strength(&self, id: usize) -> f64 {
        if self.check_resonance(id).is_err() {
            return -1.0;
        }
        let mu = self.reduced_mass();
        self.parameters[Self::block_offset(id)].exp() / D_RESONANT / mu.powf(-1.5)
    }

    pub fn resonances(&self) -> Vec<Resonance> {
        (0..self.num_resonances)
            .map(|id| Resonance {
                energy: self.resonance_energy(id),
                strength: self.resonance_strength(id),
            })
            .collect()
    }

    /// Offset of a0 for resonance `id`.
    pub fn block_offset(id: usize) -> usize {
        PARAMS_PER_TERM * (id + 1)
    }

    fn charge_product(&self) -> f64 {
        f64::from(self.z1) * f64::from(self.z2)
    }

    fn fix(&mut self, index: usize, value: f64) {
        self.parameters[index] = value;
        self.fixed[index] = true;
    }

    fn check_index(&self, index: usize) -> Result<(), RateError> {
        if index < self.parameters.len() {
            Ok(())
        } else {
            Err(RateError::ParameterIndex {
                index,
                len: self.parameters.len(),
            })
        }
    }

    fn check_resonance(&self, id: usize) -> Result<(), RateError> {
        if id < self.num_resonances {
            Ok(())
        } else {
            log::debug!(
                "rate '{}': resonance id {id} ignored, {} resonance(s) defined",
                self.name,
                self.num_resonances
            );
            Err(RateError::ResonanceOutOfRange {
                id,
                num_resonances: self.num_resonances,
            })
        }
    }
}
