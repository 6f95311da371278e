//! Classical vs. simulated comparison over a list of target lengths.
//!
//! For each length: draw a random target from the alphabet, time the
//! exhaustive enumerator and the sequential cracker on it, and attach the
//! modelled space figures. Every length gets its own `StdRng` seeded from the
//! caller's RNG up front, so sequential and parallel runs agree.

use std::time::Instant;

use grovercrack_core::{ClassicalEnumerator, CrackError, SequentialCracker};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::predict::{ComplexityPrediction, ComplexityPredictor, SpaceUnits};

/// Lengths compared when none are configured.
pub const DEFAULT_LENGTHS: &[u32] = &[2, 3, 4, 5];

/// Longest target the enumerator is timed on by default.
pub const DEFAULT_CLASSICAL_MAX_LENGTH: u32 = 4;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub lengths: Vec<u32>,
    /// Targets longer than this skip the enumerator.
    pub classical_max_length: u32,
    /// Per-target enumeration budget.
    pub classical_max_attempts: Option<u64>,
    /// Evaluate lengths on the rayon pool.
    pub parallel: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            lengths: DEFAULT_LENGTHS.to_vec(),
            classical_max_length: DEFAULT_CLASSICAL_MAX_LENGTH,
            classical_max_attempts: None,
            parallel: false,
        }
    }
}

/// One row of the comparison.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComparisonRecord {
    pub length: u32,
    pub target: String,
    pub guess: String,
    pub exact: bool,
    /// `None` when the enumerator was skipped for this length.
    pub classical_time_ms: Option<f64>,
    pub classical_attempts: Option<u64>,
    pub classical_found: Option<bool>,
    pub simulated_time_ms: f64,
    pub simulated_rounds: u64,
    pub classical_space: SpaceUnits,
    pub simulated_space: SpaceUnits,
}

pub struct Harness {
    cracker: SequentialCracker,
    enumerator: ClassicalEnumerator,
    predictor: ComplexityPredictor,
    config: HarnessConfig,
}

impl Harness {
    pub fn new(cracker: SequentialCracker, predictor: ComplexityPredictor, config: HarnessConfig) -> Self {
        let mut enumerator = ClassicalEnumerator::new(cracker.alphabet().clone());
        if let Some(max) = config.classical_max_attempts {
            enumerator = enumerator.with_max_attempts(max);
        }
        Self { cracker, enumerator, predictor, config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    pub fn predictor(&self) -> &ComplexityPredictor {
        &self.predictor
    }

    /// Uniform random string of `length` symbols.
    pub fn generate_target<R: Rng + ?Sized>(&self, length: u32, rng: &mut R) -> String {
        let symbols = self.cracker.alphabet().symbols();
        (0..length).map(|_| symbols[rng.gen_range(0..symbols.len())]).collect()
    }

    /// Time both approaches on one target.
    pub fn compare<R: Rng + ?Sized>(&self, target: &str, rng: &mut R) -> Result<ComparisonRecord, CrackError> {
        let length = target.chars().count() as u32;

        let classical = if length <= self.config.classical_max_length {
            let start = Instant::now();
            let outcome = self.enumerator.enumerate_and_match(target)?;
            Some((start.elapsed().as_secs_f64() * 1000.0, outcome))
        } else {
            tracing::debug!(length, "classical enumeration skipped");
            None
        };

        let start = Instant::now();
        let cracked = self.cracker.crack(target, rng)?;
        let simulated_time_ms = start.elapsed().as_secs_f64() * 1000.0;

        Ok(ComparisonRecord {
            length,
            target: target.to_string(),
            exact: cracked.is_exact(),
            simulated_rounds: cracked.total_rounds(),
            guess: cracked.guess,
            classical_time_ms: classical.map(|(t, _)| t),
            classical_attempts: classical.map(|(_, o)| o.attempts),
            classical_found: classical.map(|(_, o)| o.found),
            simulated_time_ms,
            classical_space: self.predictor.predict_classical_space(length),
            simulated_space: self.predictor.predict_simulated_space(length),
        })
    }

    fn run_length(&self, length: u32, seed: u64) -> Option<ComparisonRecord> {
        let mut rng = StdRng::seed_from_u64(seed);
        let target = self.generate_target(length, &mut rng);
        tracing::info!(length, target = %target, "comparing");
        match self.compare(&target, &mut rng) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::error!(length, error = %e, "length skipped");
                None
            }
        }
    }

    /// Compare every configured length. Lengths that fail are logged and
    /// left out of the result.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<ComparisonRecord> {
        let jobs: Vec<(u32, u64)> = self.config.lengths.iter().map(|&l| (l, rng.gen())).collect();
        let records: Vec<ComparisonRecord> = if self.config.parallel {
            jobs.into_par_iter().filter_map(|(l, seed)| self.run_length(l, seed)).collect()
        } else {
            jobs.into_iter().filter_map(|(l, seed)| self.run_length(l, seed)).collect()
        };
        tracing::info!(processed = records.len(), requested = self.config.lengths.len(), "comparison done");
        records
    }
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

/// Quote a text field: wrap in `"` and double any inner `"`.
fn csv_field(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

fn opt_f64(v: Option<f64>) -> String {
    v.map_or_else(String::new, |t| format!("{t:.4}"))
}

/// Format comparison records as CSV.
pub fn records_to_csv(records: &[ComparisonRecord]) -> String {
    let mut csv = String::from(
        "length,target,guess,exact,classical_time_ms,classical_attempts,\
         simulated_time_ms,simulated_rounds,classical_space,simulated_space\n",
    );
    for r in records {
        csv.push_str(&format!(
            "{},{},{},{},{},{},{:.4},{},{},{}\n",
            r.length,
            csv_field(&r.target),
            csv_field(&r.guess),
            r.exact,
            opt_f64(r.classical_time_ms),
            r.classical_attempts.map_or_else(String::new, |a| a.to_string()),
            r.simulated_time_ms,
            r.simulated_rounds,
            r.classical_space,
            r.simulated_space,
        ));
    }
    csv
}

/// Format predictions as CSV.
pub fn predictions_to_csv(predictions: &[ComplexityPrediction]) -> String {
    let mut csv = String::from(
        "length,classical_time_ms,simulated_time_ms,classical_space,simulated_space,speedup\n",
    );
    for p in predictions {
        csv.push_str(&format!(
            "{},{:.4},{:.4},{},{},{:.4e}\n",
            p.length,
            p.classical_time,
            p.simulated_time,
            p.classical_space,
            p.simulated_space,
            p.speedup(),
        ));
    }
    csv
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
