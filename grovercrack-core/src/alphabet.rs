//! Alphabet and fixed-width register encoding.
//!
//! Every symbol maps to its index in the alphabet, written as a `w`-bit code
//! where `w` is the smallest width with `2^w >= size`. Bit positions are
//! numbered MSB-first: position 0 is the leftmost digit of the rendered code.
//!
//! Before a code is used as a target pattern it passes through a
//! [`Precompensation`]: a fixed list of disjoint position swaps that models a
//! hardware bit-ordering correction. The swaps are self-inverse, so decoding
//! applies the same list to undo it.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::error::{CrackError, DecodeError, Result};

// ---------------------------------------------------------------------------
// Character sets
// ---------------------------------------------------------------------------

pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const DIGITS: &str = "0123456789";
pub const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// Placeholder rendered for patterns that decode outside the alphabet.
pub const UNKNOWN_SYMBOL: char = '?';

/// Default swap list: pairwise swaps over the first four positions.
pub const DEFAULT_SWAPS: &[(u32, u32)] = &[(0, 1), (2, 3)];

/// Smallest `w` with `2^w >= size`. A single-symbol alphabet needs no bits.
pub fn code_width(size: usize) -> u32 {
    if size <= 1 {
        0
    } else {
        usize::BITS - (size - 1).leading_zeros()
    }
}

// ---------------------------------------------------------------------------
// Pre-compensation
// ---------------------------------------------------------------------------

/// Self-inverse permutation of bit positions, stored as explicit swaps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Precompensation {
    swaps: Vec<(u32, u32)>,
}

impl Precompensation {
    /// Build from a swap list. Swaps must be pairwise disjoint and must not
    /// swap a position with itself.
    pub fn new(swaps: &[(u32, u32)]) -> Result<Self> {
        let mut seen = Vec::with_capacity(swaps.len() * 2);
        for &(a, b) in swaps {
            if a == b {
                return Err(CrackError::InvalidPrecompensation(format!(
                    "position {a} swapped with itself"
                )));
            }
            for p in [a, b] {
                if seen.contains(&p) {
                    return Err(CrackError::InvalidPrecompensation(format!(
                        "position {p} appears in more than one swap"
                    )));
                }
                seen.push(p);
            }
        }
        Ok(Self { swaps: swaps.to_vec() })
    }

    /// No swaps at all.
    pub fn identity() -> Self {
        Self { swaps: Vec::new() }
    }

    pub fn swaps(&self) -> &[(u32, u32)] {
        &self.swaps
    }

    /// Apply the swaps to a `width`-bit pattern. Swaps touching a position at
    /// or beyond `width` are skipped.
    pub fn apply(&self, bits: u64, width: u32) -> u64 {
        let mut out = bits;
        for &(a, b) in &self.swaps {
            if a >= width || b >= width {
                continue;
            }
            let sa = width - 1 - a;
            let sb = width - 1 - b;
            let ba = (out >> sa) & 1;
            let bb = (out >> sb) & 1;
            if ba != bb {
                out ^= (1 << sa) | (1 << sb);
            }
        }
        out
    }
}

impl Default for Precompensation {
    fn default() -> Self {
        Self { swaps: DEFAULT_SWAPS.to_vec() }
    }
}

// ---------------------------------------------------------------------------
// Codes and decoded symbols
// ---------------------------------------------------------------------------

/// A `width`-bit register pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct SymbolCode {
    bits: u64,
    width: u32,
}

impl SymbolCode {
    pub fn new(bits: u64, width: u32) -> Self {
        let mask = if width >= 64 { u64::MAX } else { (1u64 << width) - 1 };
        Self { bits: bits & mask, width }
    }

    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Bit at MSB-first `position`.
    pub fn bit(&self, position: u32) -> bool {
        position < self.width && (self.bits >> (self.width - 1 - position)) & 1 == 1
    }
}

impl fmt::Display for SymbolCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for p in 0..self.width {
            f.write_str(if self.bit(p) { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Result of decoding a sampled pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DecodedSymbol {
    Known(char),
    /// Pattern's index lies beyond the alphabet.
    Unknown,
}

impl DecodedSymbol {
    pub fn as_char(&self) -> char {
        match self {
            DecodedSymbol::Known(c) => *c,
            DecodedSymbol::Unknown => UNKNOWN_SYMBOL,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, DecodedSymbol::Known(_))
    }
}

impl fmt::Display for DecodedSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

// ---------------------------------------------------------------------------
// Alphabet
// ---------------------------------------------------------------------------

/// Ordered, duplicate-free symbol set with its register encoding.
#[derive(Clone, Debug)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
    width: u32,
    precompensation: Precompensation,
}

impl Alphabet {
    /// Build from the characters of `symbols`, in order.
    pub fn new(symbols: &str) -> Result<Self> {
        let chars: Vec<char> = symbols.chars().collect();
        if chars.is_empty() {
            return Err(CrackError::EmptyAlphabet);
        }
        let mut index = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            if index.insert(c, i).is_some() {
                return Err(CrackError::DuplicateSymbol(c));
            }
        }
        Ok(Self {
            width: code_width(chars.len()),
            symbols: chars,
            index,
            precompensation: Precompensation::default(),
        })
    }

    /// ASCII letters, digits and punctuation (94 symbols).
    pub fn printable() -> Self {
        Self::from_distinct(&[LOWERCASE, UPPERCASE, DIGITS, PUNCTUATION].concat())
    }

    pub fn lowercase() -> Self {
        Self::from_distinct(LOWERCASE)
    }

    pub fn lowercase_digits() -> Self {
        Self::from_distinct(&[LOWERCASE, DIGITS].concat())
    }

    pub fn alphanumeric() -> Self {
        Self::from_distinct(&[LOWERCASE, UPPERCASE, DIGITS].concat())
    }

    /// Look up a built-in alphabet by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "printable" => Some(Self::printable()),
            "lowercase" => Some(Self::lowercase()),
            "lowercase_digits" => Some(Self::lowercase_digits()),
            "alphanumeric" => Some(Self::alphanumeric()),
            _ => None,
        }
    }

    // Presets are distinct by construction.
    fn from_distinct(symbols: &str) -> Self {
        let chars: Vec<char> = symbols.chars().collect();
        let index = chars.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self {
            width: code_width(chars.len()),
            symbols: chars,
            index,
            precompensation: Precompensation::default(),
        }
    }

    /// Replace the pre-compensation swaps.
    pub fn with_precompensation(mut self, precompensation: Precompensation) -> Self {
        self.precompensation = precompensation;
        self
    }

    pub fn precompensation(&self) -> &Precompensation {
        &self.precompensation
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// Code width in bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of register patterns, `2^width`.
    pub fn search_space(&self) -> u64 {
        1u64 << self.width
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    pub fn index_of(&self, symbol: char) -> Option<usize> {
        self.index.get(&symbol).copied()
    }

    pub fn symbol_at(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    /// Characters of `text` outside the alphabet, each once, in order of
    /// first appearance.
    pub fn unsupported_chars(&self, text: &str) -> String {
        let mut out = String::new();
        for c in text.chars() {
            if !self.contains(c) && !out.contains(c) {
                out.push(c);
            }
        }
        out
    }

    /// Encode a symbol into its pre-compensated register pattern.
    pub fn encode(&self, symbol: char) -> Result<SymbolCode> {
        let idx = self.index_of(symbol).ok_or(CrackError::InvalidSymbol(symbol))?;
        let raw = idx as u64;
        Ok(SymbolCode::new(self.precompensation.apply(raw, self.width), self.width))
    }

    /// Undo pre-compensation and map the pattern back to a symbol.
    pub fn try_decode(&self, code: SymbolCode) -> std::result::Result<char, DecodeError> {
        let value = self.precompensation.apply(code.bits(), self.width);
        usize::try_from(value)
            .ok()
            .and_then(|i| self.symbol_at(i))
            .ok_or(DecodeError::OutOfRange { value, size: self.size() })
    }

    /// Like [`try_decode`](Self::try_decode), but out-of-range patterns
    /// become [`DecodedSymbol::Unknown`].
    pub fn decode(&self, code: SymbolCode) -> DecodedSymbol {
        match self.try_decode(code) {
            Ok(c) => DecodedSymbol::Known(c),
            Err(e) => {
                tracing::trace!(code = %code, error = %e, "pattern outside alphabet");
                DecodedSymbol::Unknown
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_width() {
        assert_eq!(code_width(1), 0);
        assert_eq!(code_width(2), 1);
        assert_eq!(code_width(3), 2);
        assert_eq!(code_width(16), 4);
        assert_eq!(code_width(17), 5);
        assert_eq!(code_width(36), 6);
        assert_eq!(code_width(94), 7);
    }

    #[test]
    fn test_printable_has_94_symbols() {
        let a = Alphabet::printable();
        assert_eq!(a.size(), 94);
        assert_eq!(a.width(), 7);
        assert_eq!(a.search_space(), 128);
        assert!(a.contains('~'));
        assert!(a.contains('\\'));
        assert!(!a.contains(' '));
    }

    #[test]
    fn test_empty_alphabet_rejected() {
        assert_eq!(Alphabet::new("").unwrap_err(), CrackError::EmptyAlphabet);
    }

    #[test]
    fn test_duplicate_symbol_rejected() {
        assert_eq!(Alphabet::new("abca").unwrap_err(), CrackError::DuplicateSymbol('a'));
    }

    #[test]
    fn test_precompensation_swaps_prefix() {
        let p = Precompensation::default();
        // 4-bit 1000 -> swap(0,1) -> 0100, swap(2,3) unchanged
        assert_eq!(p.apply(0b1000, 4), 0b0100);
        // 0010 -> swap(2,3) -> 0001
        assert_eq!(p.apply(0b0010, 4), 0b0001);
        // 3-bit: swap (2,3) skipped
        assert_eq!(p.apply(0b001, 3), 0b001);
        assert_eq!(p.apply(0b100, 3), 0b010);
    }

    #[test]
    fn test_precompensation_self_inverse() {
        let p = Precompensation::default();
        for w in 0..8 {
            for bits in 0..(1u64 << w) {
                assert_eq!(p.apply(p.apply(bits, w), w), bits);
            }
        }
    }

    #[test]
    fn test_precompensation_rejects_overlap() {
        assert!(Precompensation::new(&[(0, 1), (1, 2)]).is_err());
        assert!(Precompensation::new(&[(3, 3)]).is_err());
        assert!(Precompensation::new(&[(0, 4), (1, 5)]).is_ok());
    }

    #[test]
    fn test_encode_applies_precompensation() {
        let a = Alphabet::lowercase();
        // 'b' = index 1 = 00001, width 5; swaps (0,1),(2,3) leave it alone
        assert_eq!(a.encode('b').unwrap().to_string(), "00001");
        // 'i' = index 8 = 01000 -> 10000
        assert_eq!(a.encode('i').unwrap().to_string(), "10000");
        let plain = Alphabet::lowercase().with_precompensation(Precompensation::identity());
        assert_eq!(plain.encode('i').unwrap().to_string(), "01000");
    }

    #[test]
    fn test_encode_invalid_symbol() {
        let a = Alphabet::lowercase();
        assert_eq!(a.encode('A').unwrap_err(), CrackError::InvalidSymbol('A'));
    }

    #[test]
    fn test_round_trip_all_presets() {
        for name in ["printable", "lowercase", "lowercase_digits", "alphanumeric"] {
            let a = Alphabet::preset(name).unwrap();
            for &s in a.symbols() {
                let code = a.encode(s).unwrap();
                assert_eq!(a.decode(code), DecodedSymbol::Known(s), "{name}: {s:?}");
            }
        }
    }

    #[test]
    fn test_decode_out_of_range_is_unknown() {
        let a = Alphabet::new("abc").unwrap();
        // width 2, index 3 is unused; swap (0,1) maps 11 onto itself
        let code = SymbolCode::new(0b11, 2);
        assert_eq!(a.decode(code), DecodedSymbol::Unknown);
        assert_eq!(
            a.try_decode(code).unwrap_err(),
            DecodeError::OutOfRange { value: 3, size: 3 }
        );
    }

    #[test]
    fn test_single_symbol_alphabet() {
        let a = Alphabet::new("x").unwrap();
        assert_eq!(a.width(), 0);
        let code = a.encode('x').unwrap();
        assert_eq!(code.to_string(), "");
        assert_eq!(a.decode(code), DecodedSymbol::Known('x'));
    }

    #[test]
    fn test_unsupported_chars_listed_once() {
        let a = Alphabet::lowercase();
        assert_eq!(a.unsupported_chars("aB€cB€"), "B€");
        assert_eq!(a.unsupported_chars("abc"), "");
    }

    #[test]
    fn test_unknown_renders_placeholder() {
        assert_eq!(DecodedSymbol::Unknown.to_string(), "?");
        assert_eq!(DecodedSymbol::Known('z').as_char(), 'z');
    }
}
