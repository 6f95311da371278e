//! Exhaustive classical enumerator.
//!
//! Walks the cartesian product `alphabet^length` in lexicographic alphabet
//! order and counts candidates until the target is hit.

use serde::Serialize;

use crate::alphabet::Alphabet;
use crate::error::{CrackError, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EnumerationOutcome {
    pub found: bool,
    /// Candidates compared, including the match.
    pub attempts: u64,
}

/// Index counter over `size^length`, rightmost position fastest.
#[derive(Clone, Debug)]
struct Odometer {
    digits: Vec<usize>,
    base: usize,
}

impl Odometer {
    fn new(length: usize, base: usize) -> Self {
        Self { digits: vec![0; length], base }
    }

    /// Step to the next candidate. Returns false once every candidate has
    /// been visited.
    fn advance(&mut self) -> bool {
        for d in self.digits.iter_mut().rev() {
            *d += 1;
            if *d < self.base {
                return true;
            }
            *d = 0;
        }
        false
    }
}

/// Iterator over every candidate string of one length.
pub struct Candidates<'a> {
    alphabet: &'a Alphabet,
    odometer: Odometer,
    done: bool,
}

impl Iterator for Candidates<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.done {
            return None;
        }
        let s: String = self
            .odometer
            .digits
            .iter()
            .filter_map(|&i| self.alphabet.symbol_at(i))
            .collect();
        self.done = !self.odometer.advance();
        Some(s)
    }
}

#[derive(Clone, Debug)]
pub struct ClassicalEnumerator {
    alphabet: Alphabet,
    max_attempts: Option<u64>,
}

impl ClassicalEnumerator {
    pub fn new(alphabet: Alphabet) -> Self {
        Self { alphabet, max_attempts: None }
    }

    /// Stop after `max_attempts` candidates, reporting `found = false`.
    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Number of candidates of `length`, or `None` past `u128`.
    pub fn search_space(&self, length: u32) -> Option<u128> {
        (self.alphabet.size() as u128).checked_pow(length)
    }

    pub fn candidates(&self, length: usize) -> Candidates<'_> {
        Candidates {
            alphabet: &self.alphabet,
            odometer: Odometer::new(length, self.alphabet.size()),
            done: false,
        }
    }

    /// Zero-based position of `target` in enumeration order.
    pub fn rank(&self, target: &str) -> Option<u128> {
        let base = self.alphabet.size() as u128;
        target.chars().try_fold(0u128, |acc, c| {
            let i = self.alphabet.index_of(c)? as u128;
            acc.checked_mul(base)?.checked_add(i)
        })
    }

    /// Enumerate candidates of the target's length until one matches.
    pub fn enumerate_and_match(&self, target: &str) -> Result<EnumerationOutcome> {
        if target.trim().is_empty() {
            return Err(CrackError::EmptyInput);
        }
        let chars = self.alphabet.unsupported_chars(target);
        if !chars.is_empty() {
            return Err(CrackError::UnsupportedCharacter { chars });
        }

        // index_of cannot miss after the check above
        let wanted: Vec<usize> = target.chars().filter_map(|c| self.alphabet.index_of(c)).collect();
        let mut odometer = Odometer::new(wanted.len(), self.alphabet.size());
        let mut attempts = 0u64;

        loop {
            if self.max_attempts.is_some_and(|max| attempts >= max) {
                tracing::debug!(attempts, "attempt budget exhausted");
                return Ok(EnumerationOutcome { found: false, attempts });
            }
            attempts += 1;
            if odometer.digits == wanted {
                return Ok(EnumerationOutcome { found: true, attempts });
            }
            if !odometer.advance() {
                return Ok(EnumerationOutcome { found: false, attempts });
            }
        }
    }
}
