//! Amplitude-amplification simulator for a single symbol.
//!
//! The register holds `2^w` patterns, one per possible `w`-bit code. A run
//! starts from the uniform distribution and repeats `k` rounds of
//!
//! 1. **mark**: negate the amplitude of the target pattern (the oracle),
//! 2. **amplify**: invert every amplitude about the mean (diffusion),
//!
//! with `k = floor(π/4 · sqrt(2^w))`, then samples a measurement. The marked
//! pattern's probability after `r` rounds is `sin²((2r+1)θ)` with
//! `sin θ = 2^(-w/2)`; it peaks near `k` and falls off again if over-rotated.
//!
//! The oracle is an [`AmplitudeOracle`] so the substrate can be swapped:
//! [`StateVector`] keeps all `2^w` amplitudes, [`SymmetricModel`] keeps only
//! the marked amplitude and the one shared by every other pattern.

use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_4;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::alphabet::{Alphabet, DecodedSymbol, SymbolCode};
use crate::error::{CrackError, Result};

/// Widest register the state-vector backend will allocate.
pub const MAX_STATE_VECTOR_WIDTH: u32 = 20;

/// Default number of measurement shots per symbol.
pub const DEFAULT_SHOTS: u32 = 1024;

/// Optimal round count for one marked pattern among `2^width`.
pub fn optimal_rounds(width: u32) -> u32 {
    let n = 2f64.powi(width as i32);
    (FRAC_PI_4 * n.sqrt()).floor().max(0.0) as u32
}

/// Closed-form probability of the marked pattern after `rounds` rounds.
pub fn success_probability(width: u32, rounds: u32) -> f64 {
    let theta = 2f64.powf(-(width as f64) / 2.0).asin();
    ((2.0 * rounds as f64 + 1.0) * theta).sin().powi(2)
}

// ---------------------------------------------------------------------------
// Oracle capability
// ---------------------------------------------------------------------------

/// Substrate that can mark a pattern, amplify, and be measured.
pub trait AmplitudeOracle {
    /// Reset to the uniform distribution over `2^width` patterns.
    fn reset(&mut self, width: u32);

    /// Flip the sign of one pattern's amplitude.
    fn mark(&mut self, pattern: u64);

    /// Inversion about the mean.
    fn amplify(&mut self);

    /// Current probability of observing `pattern`.
    fn probability(&self, pattern: u64) -> f64;

    /// Draw one pattern from the current distribution.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64;
}

/// Full state vector of real amplitudes.
#[derive(Clone, Debug, Default)]
pub struct StateVector {
    amplitudes: Vec<f64>,
}

impl StateVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amplitudes(&self) -> &[f64] {
        &self.amplitudes
    }
}

impl AmplitudeOracle for StateVector {
    fn reset(&mut self, width: u32) {
        let n = 1usize << width;
        self.amplitudes.clear();
        self.amplitudes.resize(n, 1.0 / (n as f64).sqrt());
    }

    fn mark(&mut self, pattern: u64) {
        if let Some(a) = usize::try_from(pattern).ok().and_then(|i| self.amplitudes.get_mut(i)) {
            *a = -*a;
        }
    }

    fn amplify(&mut self) {
        let n = self.amplitudes.len() as f64;
        let mean = self.amplitudes.iter().sum::<f64>() / n;
        for a in self.amplitudes.iter_mut() {
            *a = 2.0 * mean - *a;
        }
    }

    fn probability(&self, pattern: u64) -> f64 {
        usize::try_from(pattern)
            .ok()
            .and_then(|i| self.amplitudes.get(i))
            .map_or(0.0, |a| a * a)
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let u: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (i, a) in self.amplitudes.iter().enumerate() {
            cumulative += a * a;
            if u < cumulative {
                return i as u64;
            }
        }
        // Rounding left the tail short of 1.0.
        self.amplitudes.len().saturating_sub(1) as u64
    }
}

/// Two-amplitude model: the marked pattern, and the value shared by all
/// other patterns. Exact for a single marked pattern per reset; marking a
/// different pattern after amplification has started re-targets the model
/// and is no longer exact.
#[derive(Clone, Debug, Default)]
pub struct SymmetricModel {
    width: u32,
    target: Option<u64>,
    marked: f64,
    rest: f64,
}

impl SymmetricModel {
    pub fn new() -> Self {
        Self::default()
    }

    fn patterns(&self) -> f64 {
        2f64.powi(self.width as i32)
    }
}

impl AmplitudeOracle for SymmetricModel {
    fn reset(&mut self, width: u32) {
        self.width = width;
        self.target = None;
        let a = 1.0 / self.patterns().sqrt();
        self.marked = a;
        self.rest = a;
    }

    fn mark(&mut self, pattern: u64) {
        if pattern >> self.width != 0 {
            return;
        }
        self.target = Some(pattern);
        self.marked = -self.marked;
    }

    fn amplify(&mut self) {
        let n = self.patterns();
        let mean = (self.marked + (n - 1.0) * self.rest) / n;
        self.marked = 2.0 * mean - self.marked;
        self.rest = 2.0 * mean - self.rest;
    }

    fn probability(&self, pattern: u64) -> f64 {
        if pattern >> self.width != 0 {
            0.0
        } else if self.target == Some(pattern) {
            self.marked * self.marked
        } else {
            self.rest * self.rest
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        let n = 1u64 << self.width;
        match self.target {
            Some(target) => {
                let u: f64 = rng.gen();
                if n == 1 || u < self.marked * self.marked {
                    target
                } else {
                    let r = rng.gen_range(0..n - 1);
                    if r >= target { r + 1 } else { r }
                }
            }
            None => rng.gen_range(0..n),
        }
    }
}

/// Backend selected by configuration.
#[derive(Clone, Debug)]
pub enum OracleBackend {
    StateVector(StateVector),
    Symmetric(SymmetricModel),
}

impl OracleBackend {
    pub fn new(kind: BackendKind) -> Self {
        match kind {
            BackendKind::StateVector => OracleBackend::StateVector(StateVector::new()),
            BackendKind::Symmetric => OracleBackend::Symmetric(SymmetricModel::new()),
        }
    }
}

impl AmplitudeOracle for OracleBackend {
    fn reset(&mut self, width: u32) {
        match self {
            OracleBackend::StateVector(s) => s.reset(width),
            OracleBackend::Symmetric(s) => s.reset(width),
        }
    }

    fn mark(&mut self, pattern: u64) {
        match self {
            OracleBackend::StateVector(s) => s.mark(pattern),
            OracleBackend::Symmetric(s) => s.mark(pattern),
        }
    }

    fn amplify(&mut self) {
        match self {
            OracleBackend::StateVector(s) => s.amplify(),
            OracleBackend::Symmetric(s) => s.amplify(),
        }
    }

    fn probability(&self, pattern: u64) -> f64 {
        match self {
            OracleBackend::StateVector(s) => s.probability(pattern),
            OracleBackend::Symmetric(s) => s.probability(pattern),
        }
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        match self {
            OracleBackend::StateVector(s) => s.sample(rng),
            OracleBackend::Symmetric(s) => s.sample(rng),
        }
    }
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    StateVector,
    Symmetric,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    pub backend: BackendKind,
    /// Measurement repetitions; the most frequent pattern wins. 1 = single draw.
    pub shots: u32,
    /// Fixed round count. `None` uses [`optimal_rounds`].
    pub rounds: Option<u32>,
    /// Per-bit, per-shot readout flip probability.
    pub readout_flip_probability: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::StateVector,
            shots: DEFAULT_SHOTS,
            rounds: None,
            readout_flip_probability: 0.0,
        }
    }
}

impl SimulatorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.shots == 0 {
            return Err(CrackError::InvalidConfig("shots must be at least 1".into()));
        }
        let p = self.readout_flip_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(CrackError::InvalidConfig(format!(
                "readout_flip_probability {p} outside [0, 1]"
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Simulator
// ---------------------------------------------------------------------------

/// Measured outcome for one symbol.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmplificationOutcome {
    /// Most frequent measured pattern.
    pub pattern: SymbolCode,
    /// Shots that produced `pattern`.
    pub weight: u32,
    pub shots: u32,
    pub rounds: u32,
    /// Probability of the target pattern just before measurement.
    pub target_probability: f64,
    pub decoded: DecodedSymbol,
}

/// Per-symbol simulator over one alphabet.
#[derive(Clone, Debug)]
pub struct AmplificationSimulator {
    alphabet: Alphabet,
    config: SimulatorConfig,
}

impl AmplificationSimulator {
    pub fn new(alphabet: Alphabet, config: SimulatorConfig) -> Result<Self> {
        config.validate()?;
        let width = alphabet.width();
        if config.backend == BackendKind::StateVector && width > MAX_STATE_VECTOR_WIDTH {
            return Err(CrackError::RegisterTooWide { width, max: MAX_STATE_VECTOR_WIDTH });
        }
        Ok(Self { alphabet, config })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Rounds used per symbol.
    pub fn rounds(&self) -> u32 {
        self.config.rounds.unwrap_or_else(|| optimal_rounds(self.alphabet.width()))
    }

    /// Simulate on the configured backend.
    pub fn simulate<R: Rng + ?Sized>(&self, symbol: char, rng: &mut R) -> Result<AmplificationOutcome> {
        let mut oracle = OracleBackend::new(self.config.backend);
        self.simulate_with(&mut oracle, symbol, rng)
    }

    /// Simulate on a caller-supplied oracle.
    pub fn simulate_with<O, R>(&self, oracle: &mut O, symbol: char, rng: &mut R) -> Result<AmplificationOutcome>
    where
        O: AmplitudeOracle,
        R: Rng + ?Sized,
    {
        let target = self.alphabet.encode(symbol)?;
        let width = self.alphabet.width();
        let rounds = self.rounds();

        oracle.reset(width);
        for _ in 0..rounds {
            oracle.mark(target.bits());
            oracle.amplify();
        }
        let target_probability = oracle.probability(target.bits());

        let (bits, weight) = self.measure(oracle, width, rng);
        let pattern = SymbolCode::new(bits, width);
        let decoded = self.alphabet.decode(pattern);

        tracing::debug!(
            symbol = %symbol,
            target = %target,
            measured = %pattern,
            weight,
            rounds,
            target_probability,
            "symbol simulated"
        );

        Ok(AmplificationOutcome {
            pattern,
            weight,
            shots: self.config.shots,
            rounds,
            target_probability,
            decoded,
        })
    }

    /// Sample `shots` times with readout noise and return the modal pattern.
    /// Ties go to the lowest pattern value.
    fn measure<O, R>(&self, oracle: &O, width: u32, rng: &mut R) -> (u64, u32)
    where
        O: AmplitudeOracle,
        R: Rng + ?Sized,
    {
        let p_flip = self.config.readout_flip_probability;
        let mut counts: BTreeMap<u64, u32> = BTreeMap::new();
        for _ in 0..self.config.shots {
            let mut bits = oracle.sample(rng);
            if p_flip > 0.0 {
                for b in 0..width {
                    if rng.gen_bool(p_flip) {
                        bits ^= 1 << b;
                    }
                }
            }
            *counts.entry(bits).or_insert(0) += 1;
        }

        let mut best = (0u64, 0u32);
        for (&bits, &count) in &counts {
            if count > best.1 {
                best = (bits, count);
            }
        }
        best
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded_rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn run<O: AmplitudeOracle>(oracle: &mut O, width: u32, target: u64, rounds: u32) {
        oracle.reset(width);
        for _ in 0..rounds {
            oracle.mark(target);
            oracle.amplify();
        }
    }

    #[test]
    fn test_optimal_rounds() {
        assert_eq!(optimal_rounds(0), 0);
        assert_eq!(optimal_rounds(1), 1);
        assert_eq!(optimal_rounds(2), 1);
        assert_eq!(optimal_rounds(4), 3);
        assert_eq!(optimal_rounds(6), 6);
        assert_eq!(optimal_rounds(7), 8);
    }

    #[test]
    fn test_state_vector_matches_closed_form() {
        for width in 1..=8 {
            for rounds in 0..=optimal_rounds(width) + 2 {
                let mut sv = StateVector::new();
                run(&mut sv, width, 3 % (1 << width), rounds);
                let p = sv.probability(3 % (1 << width));
                let expected = success_probability(width, rounds);
                assert!((p - expected).abs() < 1e-9,
                    "w={width} r={rounds}: {p} vs {expected}");
            }
        }
    }

    #[test]
    fn test_symmetric_matches_state_vector() {
        let width = 5;
        let target = 19;
        for rounds in 0..12 {
            let mut sv = StateVector::new();
            let mut sym = SymmetricModel::new();
            run(&mut sv, width, target, rounds);
            run(&mut sym, width, target, rounds);
            for p in [0u64, 7, target, 31] {
                assert!((sv.probability(p) - sym.probability(p)).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_state_vector_stays_normalized() {
        let mut sv = StateVector::new();
        run(&mut sv, 7, 100, 20);
        let total: f64 = sv.amplitudes().iter().map(|a| a * a).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_over_rotation_reduces_probability() {
        let k = optimal_rounds(6);
        assert!(success_probability(6, k) > 0.99);
        assert!(success_probability(6, 2 * k) < success_probability(6, k));
    }

    #[test]
    fn test_two_pattern_register_is_a_coin_flip() {
        // One round over two patterns lands exactly halfway.
        assert!((success_probability(1, optimal_rounds(1)) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_simulate_recovers_symbol() {
        let sim = AmplificationSimulator::new(Alphabet::lowercase_digits(), SimulatorConfig::default())
            .unwrap();
        let mut rng = seeded_rng();
        for c in ['a', 'q', '7', '9'] {
            let out = sim.simulate(c, &mut rng).unwrap();
            assert_eq!(out.decoded, DecodedSymbol::Known(c));
            assert_eq!(out.rounds, 6);
            assert!(out.weight > out.shots / 2);
            assert!(out.target_probability > 0.99);
        }
    }

    #[test]
    fn test_symmetric_backend_recovers_symbol() {
        let cfg = SimulatorConfig { backend: BackendKind::Symmetric, ..SimulatorConfig::default() };
        let sim = AmplificationSimulator::new(Alphabet::printable(), cfg).unwrap();
        let mut rng = seeded_rng();
        for c in ['P', '@', '~', 'z'] {
            assert_eq!(sim.simulate(c, &mut rng).unwrap().decoded, DecodedSymbol::Known(c));
        }
    }

    #[test]
    fn test_simulate_invalid_symbol() {
        let sim = AmplificationSimulator::new(Alphabet::lowercase(), SimulatorConfig::default())
            .unwrap();
        let err = sim.simulate('A', &mut seeded_rng()).unwrap_err();
        assert_eq!(err, CrackError::InvalidSymbol('A'));
    }

    #[test]
    fn test_single_shot_weight() {
        let cfg = SimulatorConfig { shots: 1, ..SimulatorConfig::default() };
        let sim = AmplificationSimulator::new(Alphabet::lowercase(), cfg).unwrap();
        let out = sim.simulate('k', &mut seeded_rng()).unwrap();
        assert_eq!(out.weight, 1);
        assert_eq!(out.shots, 1);
    }

    #[test]
    fn test_full_readout_flip_decodes_unknown() {
        // "abc": width 2, one round is exact. 'a' = 00, every bit flipped
        // gives 11 = index 3, which is outside the alphabet.
        let cfg = SimulatorConfig { shots: 16, readout_flip_probability: 1.0, ..SimulatorConfig::default() };
        let sim = AmplificationSimulator::new(Alphabet::new("abc").unwrap(), cfg).unwrap();
        let out = sim.simulate('a', &mut seeded_rng()).unwrap();
        assert_eq!(out.pattern.to_string(), "11");
        assert_eq!(out.decoded, DecodedSymbol::Unknown);
        assert_eq!(out.weight, 16);
    }

    #[test]
    fn test_zero_rounds_is_uniform() {
        let cfg = SimulatorConfig { rounds: Some(0), ..SimulatorConfig::default() };
        let sim = AmplificationSimulator::new(Alphabet::lowercase(), cfg).unwrap();
        let out = sim.simulate('m', &mut seeded_rng()).unwrap();
        assert_eq!(out.rounds, 0);
        assert!((out.target_probability - 1.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let zero_shots = SimulatorConfig { shots: 0, ..SimulatorConfig::default() };
        assert!(matches!(
            AmplificationSimulator::new(Alphabet::lowercase(), zero_shots),
            Err(CrackError::InvalidConfig(_))
        ));
        let bad_noise = SimulatorConfig { readout_flip_probability: 1.5, ..SimulatorConfig::default() };
        assert!(matches!(
            AmplificationSimulator::new(Alphabet::lowercase(), bad_noise),
            Err(CrackError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_state_vector_width_limit() {
        let huge: String = (0..=0x10FFFFu32).filter_map(char::from_u32).collect();
        let alphabet = Alphabet::new(&huge).unwrap();
        assert_eq!(alphabet.width(), 21);
        let err = AmplificationSimulator::new(alphabet.clone(), SimulatorConfig::default()).unwrap_err();
        assert_eq!(err, CrackError::RegisterTooWide { width: 21, max: MAX_STATE_VECTOR_WIDTH });
        let cfg = SimulatorConfig { backend: BackendKind::Symmetric, shots: 4, ..SimulatorConfig::default() };
        assert!(AmplificationSimulator::new(alphabet, cfg).is_ok());
    }
}
