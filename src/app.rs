//! Top-level application orchestration.
//!
//! `src/main.rs` only maps the result to an exit code; this module:
//! - parses CLI arguments and installs the logger
//! - turns flags into config structs
//! - runs the selected workflow from `pipeline`
//! - prints reports and writes optional exports

use clap::Parser;

use crate::cli::{Command, EvalArgs, GridArgs, ReactionArgs, SeedArgs, ShowArgs, SynthArgs};
use crate::domain::{EvalConfig, GridSpec, ReactionSpec, ScanSpec, SeedConfig, SynthConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `reaclib` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Eval(args) => handle_eval(&args),
        Command::Seed(args) => handle_seed(&args),
        Command::Synth(args) => handle_synth(&args),
        Command::Show(args) => handle_show(&args),
    }
}

/// `RUST_LOG` wins over `-v` flags.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env = env_logger::Env::default().default_filter_or(level);
    // A second init (e.g. from tests) is harmless.
    let _ = env_logger::Builder::from_env(env).format_timestamp(None).try_init();
}

fn handle_eval(args: &EvalArgs) -> Result<(), AppError> {
    let config = eval_config_from_args(args);
    let out = pipeline::run_eval(&config)?;

    println!("{}", crate::report::format_rate_summary(&out.rate));
    println!("{}", crate::report::format_rate_table(&out.t9, &out.values));

    if let Some(path) = &config.export_csv {
        crate::io::export::write_rate_table_csv(path, &out.rate, &out.t9)?;
    }
    if let Some(path) = &config.export_json {
        let file = crate::io::rate_file::build_rate_file(&out.rate, None, &config.grid)?;
        crate::io::rate_file::write_rate_json(path, &file)?;
    }
    Ok(())
}

fn handle_seed(args: &SeedArgs) -> Result<(), AppError> {
    let config = seed_config_from_args(args);
    let out = pipeline::run_seed(&config)?;

    println!("{}", crate::report::format_ingest(&out.ingest));
    if let (Some(spec), Some(scan)) = (&config.scan, &out.scan) {
        println!("{}", crate::report::format_scan(spec.resonance_id, scan));
    }
    println!("{}", crate::report::format_rate_summary(&out.rate));
    println!("{}", crate::report::format_quality(&out.quality));
    println!("{}", crate::report::format_residuals(&out.residuals));

    if let Some(path) = &config.export_json {
        let file = crate::io::rate_file::build_rate_file(&out.rate, Some(out.quality.clone()), &config.grid)?;
        crate::io::rate_file::write_rate_json(path, &file)?;
    }
    Ok(())
}

fn handle_synth(args: &SynthArgs) -> Result<(), AppError> {
    let config = synth_config_from_args(args);
    let (_, samples) = pipeline::run_synth(&config)?;
    crate::io::export::write_samples_csv(&config.output, &samples)?;
    println!("wrote {} samples to '{}'", samples.len(), config.output.display());
    Ok(())
}

fn handle_show(args: &ShowArgs) -> Result<(), AppError> {
    let file = crate::io::rate_file::read_rate_json(&args.file)?;
    let rate = crate::io::rate_file::rate_from_file(&file)?;

    println!("{}", crate::report::format_rate_summary(&rate));
    if let Some(quality) = &file.quality {
        println!("{}", crate::report::format_quality(quality));
    }
    if !args.t9.is_empty() {
        let values = rate.evaluate_many(&args.t9);
        println!("{}", crate::report::format_rate_table(&args.t9, &values));
    }
    Ok(())
}

pub fn reaction_from_args(args: &ReactionArgs) -> ReactionSpec {
    ReactionSpec {
        name: args.name.clone(),
        z1: args.z1,
        z2: args.z2,
        mu_amu: args.mu,
        s_factor: args.s_factor,
        resonances: args.resonances.clone(),
    }
}

pub fn grid_from_args(args: &GridArgs) -> GridSpec {
    GridSpec {
        t9_min: args.t9_min,
        t9_max: args.t9_max,
        steps: args.steps,
    }
}

pub fn eval_config_from_args(args: &EvalArgs) -> EvalConfig {
    EvalConfig {
        reaction: reaction_from_args(&args.reaction),
        grid: grid_from_args(&args.grid),
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
    }
}

pub fn seed_config_from_args(args: &SeedArgs) -> SeedConfig {
    SeedConfig {
        input: args.input.clone(),
        reaction: reaction_from_args(&args.reaction),
        release_s_factor: args.release_s_factor,
        scan: args.scan_resonance.map(|resonance_id| ScanSpec {
            resonance_id,
            e_min: args.e_min,
            e_max: args.e_max,
            steps: args.e_steps,
        }),
        grid: grid_from_args(&args.grid),
        export_json: args.export_json.clone(),
    }
}

pub fn synth_config_from_args(args: &SynthArgs) -> SynthConfig {
    SynthConfig {
        reaction: reaction_from_args(&args.reaction),
        grid: grid_from_args(&args.grid),
        noise_rel: args.noise,
        seed: args.seed,
        output: args.output.clone(),
    }
}
