//! Classical vs. simulated comparison over a range of target lengths.
//!
//! Prints CSV (or JSON with `--json`) to stdout; progress goes to stderr.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use grovercrack_analysis::{init_tracing, load_config, records_to_csv, AlphabetSource};
use grovercrack_core::BackendKind;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Parser, Debug)]
#[command(name = "compare")]
#[command(about = "Time exhaustive enumeration against simulated per-character search")]
struct Args {
    /// JSON config file; CLI flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Alphabet preset (printable, lowercase, lowercase_digits, alphanumeric) or literal symbols
    #[arg(short, long)]
    alphabet: Option<String>,

    /// Target lengths, comma separated
    #[arg(short, long, value_delimiter = ',')]
    lengths: Option<Vec<u32>>,

    /// Skip the enumerator for targets longer than this
    #[arg(long)]
    classical_max_length: Option<u32>,

    /// Measurement shots per character
    #[arg(long)]
    shots: Option<u32>,

    /// Use the two-amplitude model instead of the full state vector
    #[arg(long)]
    symmetric: bool,

    #[arg(short, long)]
    seed: Option<u64>,

    /// Run lengths on the rayon pool
    #[arg(short, long)]
    parallel: bool,

    /// Emit JSON instead of CSV
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
    if let Some(lengths) = args.lengths {
        config.harness.lengths = lengths;
    }
    if let Some(max) = args.classical_max_length {
        config.harness.classical_max_length = max;
    }
    if let Some(shots) = args.shots {
        config.simulator.shots = shots;
    }
    if args.symmetric {
        config.simulator.backend = BackendKind::Symmetric;
    }
    if args.parallel {
        config.harness.parallel = true;
    }
    config.seed = args.seed.or(config.seed);
    config.validate().context("invalid settings")?;

    let harness = config.build_harness().context("building harness")?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let records = harness.run(&mut rng);
    if records.len() < config.harness.lengths.len() {
        tracing::warn!(
            missing = config.harness.lengths.len() - records.len(),
            "some lengths produced no record"
        );
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", records_to_csv(&records));
    }
    Ok(())
}
