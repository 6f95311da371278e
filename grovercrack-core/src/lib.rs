//! # grovercrack-core
//!
//! Per-character amplitude-amplification search over a known alphabet.
//!
//! This crate implements three things:
//!
//! 1. **Encoding**: symbols map to fixed-width register codes, passed through
//!    a self-inverse bit-position swap before use as a target pattern.
//!
//! 2. **Amplification simulator**: oracle + diffusion rounds over `2^w`
//!    patterns, sampled many times, with the modal pattern decoded back into a
//!    symbol.
//!
//! 3. **Sequential cracker**: one independent simulation per position of a
//!    target string, plus the exhaustive classical enumerator it is
//!    compared against.
//!
//! Cost modelling lives in `grovercrack-analysis`.

pub mod alphabet;
pub mod amplify;
pub mod classical;
pub mod cracker;
pub mod error;

pub use alphabet::{
    code_width, Alphabet, DecodedSymbol, Precompensation, SymbolCode,
    DEFAULT_SWAPS, DIGITS, LOWERCASE, PUNCTUATION, UNKNOWN_SYMBOL, UPPERCASE,
};

pub use amplify::{
    optimal_rounds, success_probability,
    AmplificationOutcome, AmplificationSimulator, AmplitudeOracle,
    BackendKind, OracleBackend, SimulatorConfig, StateVector, SymmetricModel,
    DEFAULT_SHOTS, MAX_STATE_VECTOR_WIDTH,
};

pub use classical::{Candidates, ClassicalEnumerator, EnumerationOutcome};
pub use cracker::{CrackResult, SequentialCracker};
pub use error::{CrackError, DecodeError};
