//! Predicted time and space for a range of lengths, plus the crossover.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grovercrack_analysis::{
    init_tracing, load_config, predictions_to_csv, AlphabetSource, DEFAULT_CROSSOVER_SCAN,
};

#[derive(Parser, Debug)]
#[command(name = "predict")]
#[command(about = "Extrapolate classical and simulated search cost from a calibration point")]
struct Args {
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Alphabet preset or literal symbols; sets the calibration alphabet size
    #[arg(short, long)]
    alphabet: Option<String>,

    #[arg(long, default_value_t = 1)]
    min_length: u32,

    #[arg(long, default_value_t = 12)]
    max_length: u32,

    /// Longest length searched for the crossover
    #[arg(long, default_value_t = DEFAULT_CROSSOVER_SCAN)]
    scan: u32,

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
    let predictor = config.build_predictor().context("building predictor")?;
    tracing::info!(
        alphabet_size = predictor.calibration().alphabet_size,
        scaling_factor = predictor.scaling_factor(),
        qubits_per_char = predictor.qubits_per_char(),
        "predictor ready"
    );

    let predictions = predictor.predict_range(args.min_length, args.max_length);
    let crossover = predictor.find_crossover(args.scan);

    if args.json {
        let out = serde_json::json!({
            "calibration": predictor.calibration(),
            "predictions": predictions,
            "crossover": crossover,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print!("{}", predictions_to_csv(&predictions));
    match crossover {
        Some(c) => eprintln!(
            "crossover: simulated search is faster from length {} ({:.2} ms)",
            c.length, c.simulated_time
        ),
        None => eprintln!("crossover: none up to length {}", args.scan),
    }
    Ok(())
}
