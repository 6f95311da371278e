//! # grovercrack-analysis
//!
//! Cost modelling and measurement on top of `grovercrack-core`.
//!
//! This crate implements three things:
//!
//! 1. **Complexity predictor**: closed-form time and space extrapolation for
//!    classical enumeration vs. simulated amplitude amplification, anchored at
//!    a measured calibration point, plus the crossover length.
//!
//! 2. **Comparison harness**: times both approaches on random targets over a
//!    range of lengths, sequentially or on the rayon pool, and writes CSV.
//!
//! 3. **Run configuration**: a JSON file with defaults for every field, shared
//!    by the `compare`, `predict` and `crack` binaries.

pub mod config;
pub mod harness;
pub mod predict;

use std::path::Path;

use tracing_subscriber::EnvFilter;

pub use config::{AlphabetSource, AppConfig, ConfigError};
pub use harness::{
    predictions_to_csv, records_to_csv, ComparisonRecord, Harness, HarnessConfig,
    DEFAULT_CLASSICAL_MAX_LENGTH, DEFAULT_LENGTHS,
};
pub use predict::{
    Calibration, ComplexityPrediction, ComplexityPredictor, Crossover, PredictError, SpaceUnits,
    CALIBRATION_LENGTH, DEFAULT_CROSSOVER_SCAN,
};

/// Install the stderr `fmt` subscriber. `RUST_LOG` wins; otherwise `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second install (tests, embedding) is not an error worth surfacing.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Config from `path`, or defaults when no path was given.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(p) => {
            let config = AppConfig::load(p)?;
            tracing::info!(path = %p.display(), "loaded config");
            Ok(config)
        }
        None => Ok(AppConfig::default()),
    }
}
