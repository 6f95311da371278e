//! Recover a single target string with the sequential cracker.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grovercrack_analysis::{init_tracing, load_config, AlphabetSource};
use grovercrack_core::BackendKind;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "crack")]
#[command(about = "Recover a string one character at a time by simulated amplitude amplification")]
struct Args {
    target: String,

    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long)]
    alphabet: Option<String>,

    #[arg(long)]
    shots: Option<u32>,

    /// Fixed round count (default: optimal for the register width)
    #[arg(long)]
    rounds: Option<u32>,

    /// Per-bit readout flip probability
    #[arg(long)]
    noise: Option<f64>,

    #[arg(long)]
    symmetric: bool,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Print every per-character outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let mut config = load_config(args.config.as_deref()).context("loading config")?;
    if let Some(a) = &args.alphabet {
        config.alphabet = AlphabetSource::parse(a);
    }
    if let Some(shots) = args.shots {
        config.simulator.shots = shots;
    }
    if args.rounds.is_some() {
        config.simulator.rounds = args.rounds;
    }
    if let Some(p) = args.noise {
        config.simulator.readout_flip_probability = p;
    }
    if args.symmetric {
        config.simulator.backend = BackendKind::Symmetric;
    }
    config.seed = args.seed.or(config.seed);
    config.validate().context("invalid settings")?;

    let cracker = config.build_cracker().context("building cracker")?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let result = cracker
        .crack(&args.target, &mut rng)
        .with_context(|| format!("cracking {:?}", args.target))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let marks: String = result.matches.iter().map(|&m| if m { '^' } else { 'x' }).collect();
    println!("target : {}", args.target);
    println!("guess  : {}", result.guess);
    println!("match  : {marks}");
    println!(
        "rounds : {} over {} characters ({} mismatched)",
        result.total_rounds(),
        result.matches.len(),
        result.mismatches().len()
    );
    Ok(())
}
