//! Command-line parsing for the `reaclib` tool.
//!
//! Argument parsing stays separate from the model and fitting code; flags are
//! turned into the plain config structs in `domain` by `app`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::Resonance;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "reaclib", version, about = "REACLIB reaction rate model and seeding tool")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Evaluate a rate built from physical inputs on a T9 grid.
    Eval(EvalArgs),
    /// Seed coefficients from measured or tabulated rate samples.
    Seed(SeedArgs),
    /// Generate noisy synthetic samples from a rate.
    Synth(SynthArgs),
    /// Print a saved rate file.
    Show(ShowArgs),
}

/// Physical description of the reaction.
#[derive(Debug, Args, Clone)]
pub struct ReactionArgs {
    /// Label stored in exports.
    #[arg(long, default_value = "rate")]
    pub name: String,

    /// Target atomic number.
    #[arg(long)]
    pub z1: u32,

    /// Projectile atomic number.
    #[arg(long)]
    pub z2: u32,

    /// Reduced mass in amu.
    #[arg(long)]
    pub mu: f64,

    /// S-factor at zero energy in MeV b. Leaves a0 free when omitted.
    #[arg(long)]
    pub s_factor: Option<f64>,

    /// Narrow resonance as `ENERGY:STRENGTH` (MeV), repeatable.
    #[arg(long = "resonance", value_name = "E:WG", value_parser = parse_resonance)]
    pub resonances: Vec<Resonance>,
}

/// Log-spaced temperature grid.
#[derive(Debug, Args, Clone)]
pub struct GridArgs {
    /// Lowest temperature (GK).
    #[arg(long, default_value_t = 0.01)]
    pub t9_min: f64,

    /// Highest temperature (GK).
    #[arg(long, default_value_t = 10.0)]
    pub t9_max: f64,

    /// Number of grid points.
    #[arg(long, default_value_t = 50)]
    pub steps: usize,
}

#[derive(Debug, Args, Clone)]
pub struct EvalArgs {
    #[command(flatten)]
    pub reaction: ReactionArgs,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Export the rate and per-term contributions to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the rate file (JSON).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SeedArgs {
    /// Samples CSV with `t9,rate[,error]` columns.
    #[arg(short, long, value_name = "CSV")]
    pub input: PathBuf,

    #[command(flatten)]
    pub reaction: ReactionArgs,

    /// Let the non-resonant a0 vary even when `--s-factor` is given.
    #[arg(long)]
    pub release_s_factor: bool,

    /// Scan the energy of this resonance before seeding.
    #[arg(long, value_name = "ID")]
    pub scan_resonance: Option<usize>,

    /// Lowest scanned resonance energy (MeV).
    #[arg(long, default_value_t = 0.01)]
    pub e_min: f64,

    /// Highest scanned resonance energy (MeV).
    #[arg(long, default_value_t = 2.0)]
    pub e_max: f64,

    /// Number of scanned energies.
    #[arg(long, default_value_t = 40)]
    pub e_steps: usize,

    // Grid stored in the exported rate file.
    #[command(flatten)]
    pub grid: GridArgs,

    /// Export the seeded rate file (JSON).
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct SynthArgs {
    #[command(flatten)]
    pub reaction: ReactionArgs,

    #[command(flatten)]
    pub grid: GridArgs,

    /// Relative 1σ noise, e.g. 0.05 for 5%.
    #[arg(long, default_value_t = 0.05)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output CSV.
    #[arg(short, long, value_name = "CSV")]
    pub output: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ShowArgs {
    /// Rate file produced by `--export-json`.
    #[arg(value_name = "JSON")]
    pub file: PathBuf,

    /// Evaluate the rate at these temperatures (GK).
    #[arg(long, value_delimiter = ',')]
    pub t9: Vec<f64>,
}

fn parse_resonance(s: &str) -> Result<Resonance, String> {
    let (e, w) = s
        .split_once(':')
        .ok_or_else(|| format!("expected ENERGY:STRENGTH, got `{s}`"))?;
    let energy = e
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid resonance energy: {e}"))?;
    let strength = w
        .trim()
        .parse::<f64>()
        .map_err(|e| format!("invalid resonance strength: {e}"))?;
    if !(strength.is_finite() && strength > 0.0) {
        return Err(format!("resonance strength must be > 0 (got {strength})"));
    }
    Ok(Resonance { energy, strength })
}
