//! Sequential per-character cracker.
//!
//! Each position of the target gets its own independent amplification run;
//! nothing is shared across positions and there is no joint oracle over the
//! whole string. Simulated cost therefore grows with length times the
//! per-symbol cost, not with the square root of the full string space.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use crate::alphabet::Alphabet;
use crate::amplify::{AmplificationOutcome, AmplificationSimulator, SimulatorConfig};
use crate::error::{CrackError, Result};

/// Assembled guess for one target string.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrackResult {
    /// One decoded symbol per position. Out-of-range patterns render as `?`.
    pub guess: String,
    /// Whether each position decoded to the true symbol.
    pub matches: Vec<bool>,
    pub outcomes: Vec<AmplificationOutcome>,
}

impl CrackResult {
    /// Every position matched.
    pub fn is_exact(&self) -> bool {
        self.matches.iter().all(|&m| m)
    }

    /// Positions that decoded to the wrong symbol.
    pub fn mismatches(&self) -> Vec<usize> {
        self.matches
            .iter()
            .enumerate()
            .filter(|(_, m)| !**m)
            .map(|(i, _)| i)
            .collect()
    }

    /// Oracle rounds spent across all positions.
    pub fn total_rounds(&self) -> u64 {
        self.outcomes.iter().map(|o| o.rounds as u64).sum()
    }
}

/// Applies an [`AmplificationSimulator`] to every position of a target.
#[derive(Clone, Debug)]
pub struct SequentialCracker {
    simulator: AmplificationSimulator,
}

impl SequentialCracker {
    pub fn new(alphabet: Alphabet, config: SimulatorConfig) -> Result<Self> {
        Ok(Self { simulator: AmplificationSimulator::new(alphabet, config)? })
    }

    pub fn from_simulator(simulator: AmplificationSimulator) -> Self {
        Self { simulator }
    }

    pub fn simulator(&self) -> &AmplificationSimulator {
        &self.simulator
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.simulator.alphabet()
    }

    /// Reject empty, whitespace-only, or out-of-alphabet targets.
    pub fn validate(&self, target: &str) -> Result<()> {
        if target.trim().is_empty() {
            return Err(CrackError::EmptyInput);
        }
        let chars = self.alphabet().unsupported_chars(target);
        if !chars.is_empty() {
            return Err(CrackError::UnsupportedCharacter { chars });
        }
        Ok(())
    }

    /// Crack `target` left to right. Input is validated before any
    /// simulation runs; wrong guesses are reported, never raised.
    pub fn crack<R: Rng + ?Sized>(&self, target: &str, rng: &mut R) -> Result<CrackResult> {
        self.validate(target)?;

        let len = target.chars().count();
        let mut guess = String::with_capacity(len);
        let mut matches = Vec::with_capacity(len);
        let mut outcomes = Vec::with_capacity(len);

        for (position, c) in target.chars().enumerate() {
            let outcome = self.simulator.simulate(c, rng)?;
            let hit = outcome.decoded.as_char() == c && outcome.decoded.is_known();
            if !hit {
                tracing::warn!(
                    position,
                    expected = %c,
                    got = %outcome.decoded,
                    weight = outcome.weight,
                    "position mismatch"
                );
            }
            guess.push(outcome.decoded.as_char());
            matches.push(hit);
            outcomes.push(outcome);
        }

        Ok(CrackResult { guess, matches, outcomes })
    }

    /// Crack with a fresh `StdRng` seeded from `seed`.
    pub fn crack_with_seed(&self, target: &str, seed: u64) -> Result<CrackResult> {
        self.crack(target, &mut StdRng::seed_from_u64(seed))
    }

    /// Crack with thread-local process entropy.
    pub fn crack_entropy(&self, target: &str) -> Result<CrackResult> {
        self.crack(target, &mut rand::thread_rng())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::DecodedSymbol;

    fn cracker(alphabet: Alphabet) -> SequentialCracker {
        SequentialCracker::new(alphabet, SimulatorConfig::default()).unwrap()
    }

    #[test]
    fn test_empty_and_whitespace_rejected() {
        let c = cracker(Alphabet::printable());
        assert_eq!(c.crack_with_seed("", 1).unwrap_err(), CrackError::EmptyInput);
        assert_eq!(c.crack_with_seed("   ", 1).unwrap_err(), CrackError::EmptyInput);
        assert_eq!(c.crack_with_seed("\t\n", 1).unwrap_err(), CrackError::EmptyInput);
    }

    #[test]
    fn test_unsupported_character_reported() {
        let c = cracker(Alphabet::printable());
        assert_eq!(
            c.crack_with_seed("€", 1).unwrap_err(),
            CrackError::UnsupportedCharacter { chars: "€".into() }
        );
        assert_eq!(
            c.crack_with_seed("ab£€¥a€", 1).unwrap_err(),
            CrackError::UnsupportedCharacter { chars: "£€¥".into() }
        );
    }

    #[test]
    fn test_inner_space_is_unsupported_for_printable() {
        // Space is not in the printable set, but the input is not blank.
        let c = cracker(Alphabet::printable());
        assert_eq!(
            c.crack_with_seed("a b", 1).unwrap_err(),
            CrackError::UnsupportedCharacter { chars: " ".into() }
        );
    }

    #[test]
    fn test_crack_mixed_password() {
        let c = cracker(Alphabet::printable());
        let result = c.crack_with_seed("Pass@123", 42).unwrap();
        assert_eq!(result.guess, "Pass@123");
        assert!(result.is_exact());
        assert_eq!(result.outcomes.len(), 8);
        assert_eq!(result.total_rounds(), 8 * 8);
    }

    #[test]
    fn test_crack_same_length_under_noise() {
        let cfg = SimulatorConfig { shots: 1, readout_flip_probability: 0.3, ..SimulatorConfig::default() };
        let c = SequentialCracker::new(Alphabet::lowercase(), cfg).unwrap();
        let target = "abcdefghijklmnop";
        let result = c.crack_with_seed(target, 7).unwrap();
        assert_eq!(result.guess.chars().count(), target.len());
        assert_eq!(result.matches.len(), target.len());
        // Heavy noise on single shots: at least one position should miss.
        assert!(!result.is_exact());
        for i in result.mismatches() {
            assert_ne!(result.outcomes[i].decoded, DecodedSymbol::Known(target.as_bytes()[i] as char));
        }
    }

    #[test]
    fn test_crack_is_repeatable_per_seed() {
        let c = cracker(Alphabet::lowercase_digits());
        let a = c.crack_with_seed("zz9", 5).unwrap();
        let b = c.crack_with_seed("zz9", 5).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_crack_entropy() {
        let c = cracker(Alphabet::lowercase_digits());
        let result = c.crack_entropy("ab1").unwrap();
        assert_eq!(result.matches.len(), 3);
    }
}
