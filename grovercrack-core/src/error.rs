//! Error types for encoding, simulation and cracking.

/// Errors from building alphabets, encoding symbols and validating targets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrackError {
    /// Symbol is not a member of the alphabet.
    #[error("symbol {0:?} is not in the alphabet")]
    InvalidSymbol(char),
    /// Target string contains characters outside the alphabet.
    #[error("unsupported characters in target: {chars:?}")]
    UnsupportedCharacter {
        /// Offending characters, each listed once in order of first appearance.
        chars: String,
    },
    /// Target string is empty or whitespace only.
    #[error("target is empty or whitespace only")]
    EmptyInput,
    /// Alphabet has no symbols.
    #[error("alphabet must contain at least one symbol")]
    EmptyAlphabet,
    /// Alphabet lists the same symbol twice.
    #[error("alphabet contains duplicate symbol {0:?}")]
    DuplicateSymbol(char),
    /// Alphabet needs a wider register than the simulator supports.
    #[error("code width {width} exceeds the supported maximum of {max}")]
    RegisterTooWide {
        /// Required code width in bits.
        width: u32,
        /// Largest supported width.
        max: u32,
    },
    /// Swap list is not a self-inverse permutation.
    #[error("invalid pre-compensation: {0}")]
    InvalidPrecompensation(String),
    /// Simulator parameters out of range.
    #[error("invalid simulator config: {0}")]
    InvalidConfig(String),
}

/// A sampled pattern that does not name an alphabet entry.
///
/// Only surfaced by [`Alphabet::try_decode`](crate::Alphabet::try_decode);
/// [`Alphabet::decode`](crate::Alphabet::decode) recovers it into
/// [`DecodedSymbol::Unknown`](crate::DecodedSymbol::Unknown).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("decoded index {value} is outside alphabet of size {size}")]
    OutOfRange { value: u64, size: usize },
}

pub type Result<T> = std::result::Result<T, CrackError>;
