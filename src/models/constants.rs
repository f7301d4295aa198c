//! Physical constants of the REACLIB parameterization.

/// Coefficients per term (a0..a6).
pub const PARAMS_PER_TERM: usize = 7;

/// Non-resonant a0 constant `B`, in cm³ s⁻¹ mole⁻¹ MeV⁻¹ b⁻¹.
pub const B_NONRESONANT: f64 = 7.8318e9;

/// Narrow-resonance a0 constant `D`, in cm³ s⁻¹ mole⁻¹ MeV⁻¹.
pub const D_RESONANT: f64 = 1.5394e11;

/// Coulomb-barrier factor in the non-resonant a2 term.
pub const A2_COULOMB: f64 = -4.2486;

/// `1 / k_B` in T9 per MeV, used by the resonance a1 term.
pub const A1_RESONANCE: f64 = -11.6045;

/// Fixed a6 of the non-resonant term.
pub const A6_NONRESONANT: f64 = -2.0 / 3.0;

/// Fixed a6 of a narrow-resonance term.
pub const A6_RESONANT: f64 = -3.0 / 2.0;
