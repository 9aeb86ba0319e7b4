//! Ordered symbol sets with index lookup in both directions.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{EnigmaError, Result};

/// The classic 26-letter machine alphabet.
pub const UPPER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// A finite, ordered, duplicate-free set of symbols.
///
/// Symbol `i` of the alphabet is the `i`th character it was built from.
/// An alphabet never changes after construction, so machines and
/// permutations share it behind an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Builds an alphabet from the characters of `chars`, in order.
    ///
    /// # Errors
    /// [`EnigmaError::DuplicateSymbol`] if a character repeats, and
    /// [`EnigmaError::InvalidConfiguration`] for an empty input.
    pub fn new(chars: &str) -> Result<Self> {
        let symbols: Vec<char> = chars.chars().collect();
        if symbols.is_empty() {
            return Err(EnigmaError::InvalidConfiguration(
                "alphabet must contain at least one symbol".into(),
            ));
        }
        let mut index = HashMap::with_capacity(symbols.len());
        for (i, &c) in symbols.iter().enumerate() {
            if index.insert(c, i).is_some() {
                return Err(EnigmaError::DuplicateSymbol(c));
            }
        }
        Ok(Alphabet { symbols, index })
    }

    /// The `A..Z` alphabet.
    pub fn upper() -> Self {
        // UPPER is 26 distinct letters.
        let symbols: Vec<char> = UPPER.chars().collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Alphabet { symbols, index }
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    /// True iff `c` belongs to the alphabet.
    pub fn contains(&self, c: char) -> bool {
        self.index.contains_key(&c)
    }

    /// Index of `c`.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidSymbol`] if `c` is not in the alphabet.
    pub fn to_index(&self, c: char) -> Result<usize> {
        self.index
            .get(&c)
            .copied()
            .ok_or(EnigmaError::InvalidSymbol(c))
    }

    /// Symbol at `index`.
    ///
    /// # Panics
    /// If `index >= self.size()`.
    pub fn to_symbol(&self, index: usize) -> char {
        self.symbols[index]
    }

    /// Symbol at `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<char> {
        self.symbols.get(index).copied()
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }

    /// Converts every character of `s` to its index.
    pub fn indices(&self, s: &str) -> Result<Vec<usize>> {
        s.chars().map(|c| self.to_index(c)).collect()
    }

    /// Reduces an arbitrary signed offset into `0..size()`.
    pub(crate) fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }
}

impl FromStr for Alphabet {
    type Err = EnigmaError;

    fn from_str(s: &str) -> Result<Self> {
        Alphabet::new(s)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.symbols {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
