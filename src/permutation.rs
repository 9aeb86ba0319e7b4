//! Substitutions over an [`Alphabet`] described in cycle notation.
//!
//! A permutation such as `(AELTPHQXRU) (BKNW) (S)` sends every symbol to
//! the one that follows it inside its group, wrapping from the last member
//! back to the first. Symbols in no group map to themselves.
//!
//! The parsed cycles are kept for display and validation, but lookups never
//! touch them: forward and inverse tables are rebuilt whenever a cycle is
//! added, so [`Permutation::permute`] and [`Permutation::invert`] are plain
//! array reads.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};

/// A bijection over the indices of an alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    cycles: Vec<Vec<char>>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// The identity permutation over `alphabet`.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let table: Vec<usize> = (0..alphabet.size()).collect();
        Permutation {
            alphabet,
            cycles: Vec::new(),
            forward: table.clone(),
            inverse: table,
        }
    }

    /// Parses `cycles`, a sequence of parenthesized groups, over `alphabet`.
    ///
    /// Whitespace between groups is ignored; every character inside a
    /// group is a member of that cycle.
    ///
    /// # Errors
    /// [`EnigmaError::MalformedCycle`] for unbalanced or empty groups, stray
    /// characters between groups, symbols outside the alphabet, or a symbol
    /// listed twice.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use enigma_rotor::{Alphabet, Permutation};
    ///
    /// let alpha = Arc::new(Alphabet::upper());
    /// let perm = Permutation::new("(AZ)", alpha).unwrap();
    /// assert_eq!(perm.permute_symbol('A').unwrap(), 'Z');
    /// assert_eq!(perm.permute_symbol('B').unwrap(), 'B');
    /// ```
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let mut perm = Permutation::identity(alphabet);
        perm.add_cycle(cycles)?;
        Ok(perm)
    }

    /// Builds the permutation that sends symbol `i` of `alphabet` to the
    /// `i`th character of `images`, as rotor wiring tables are usually
    /// written (`EKMFLGDQVZNTOWYHXUSPAIBRCJ`).
    ///
    /// # Errors
    /// [`EnigmaError::MalformedCycle`] if `images` is not a rearrangement of
    /// the alphabet.
    pub fn from_mapping(images: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let n = alphabet.size();
        let mut forward = Vec::with_capacity(n);
        for c in images.chars() {
            let idx = alphabet
                .to_index(c)
                .map_err(|_| EnigmaError::MalformedCycle(format!("{c:?} is not in the alphabet")))?;
            forward.push(idx);
        }
        if forward.len() != n {
            return Err(EnigmaError::MalformedCycle(format!(
                "mapping has {} symbols, alphabet has {}",
                forward.len(),
                n
            )));
        }

        let mut inverse = vec![usize::MAX; n];
        for (i, &to) in forward.iter().enumerate() {
            if inverse[to] != usize::MAX {
                return Err(EnigmaError::MalformedCycle(format!(
                    "{:?} is the image of more than one symbol",
                    alphabet.to_symbol(to)
                )));
            }
            inverse[to] = i;
        }

        let mut seen = vec![false; n];
        let mut cycles = Vec::new();
        for start in 0..n {
            if seen[start] || forward[start] == start {
                seen[start] = true;
                continue;
            }
            let mut cycle = Vec::new();
            let mut p = start;
            while !seen[p] {
                seen[p] = true;
                cycle.push(alphabet.to_symbol(p));
                p = forward[p];
            }
            cycles.push(cycle);
        }

        Ok(Permutation {
            alphabet,
            cycles,
            forward,
            inverse,
        })
    }

    /// Adds the groups of `cycles` to this permutation.
    ///
    /// Either every group is added or, on error, the permutation is left as
    /// it was.
    ///
    /// # Errors
    /// [`EnigmaError::MalformedCycle`] under the same conditions as
    /// [`Permutation::new`], and when a symbol already belongs to one of this
    /// permutation's cycles.
    pub fn add_cycle(&mut self, cycles: &str) -> Result<()> {
        let groups = parse_groups(cycles)?;
        let n = self.alphabet.size();

        let mut claimed = vec![false; n];
        for c in self.cycles.iter().flatten() {
            // Existing members were validated on insertion.
            if let Ok(i) = self.alphabet.to_index(*c) {
                claimed[i] = true;
            }
        }

        let mut indexed = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut members = Vec::with_capacity(group.len());
            for &c in group {
                let i = self.alphabet.to_index(c).map_err(|_| {
                    EnigmaError::MalformedCycle(format!("{c:?} is not in the alphabet"))
                })?;
                if claimed[i] {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "{c:?} already belongs to a cycle"
                    )));
                }
                claimed[i] = true;
                members.push(i);
            }
            indexed.push(members);
        }

        for members in &indexed {
            for (k, &from) in members.iter().enumerate() {
                let to = members[(k + 1) % members.len()];
                self.forward[from] = to;
                self.inverse[to] = from;
            }
        }
        self.cycles.extend(groups);
        Ok(())
    }

    /// Size of the underlying alphabet.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// The alphabet this permutation acts on.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// The cycles added so far, in insertion order.
    pub fn cycles(&self) -> &[Vec<char>] {
        &self.cycles
    }

    /// Image of index `p`, taken modulo the alphabet size.
    pub fn permute(&self, p: usize) -> usize {
        self.forward[p % self.size()]
    }

    /// Preimage of index `c`, taken modulo the alphabet size.
    pub fn invert(&self, c: usize) -> usize {
        self.inverse[c % self.size()]
    }

    /// Image of symbol `p`.
    pub fn permute_symbol(&self, p: char) -> Result<char> {
        let i = self.alphabet.to_index(p)?;
        Ok(self.alphabet.to_symbol(self.permute(i)))
    }

    /// Preimage of symbol `c`.
    pub fn invert_symbol(&self, c: char) -> Result<char> {
        let i = self.alphabet.to_index(c)?;
        Ok(self.alphabet.to_symbol(self.invert(i)))
    }

    /// True iff no symbol maps to itself.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| i != to)
    }
}

impl fmt::Display for Permutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (k, cycle) in self.cycles.iter().enumerate() {
            if k > 0 {
                f.write_str(" ")?;
            }
            f.write_str("(")?;
            for c in cycle {
                write!(f, "{}", c)?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}

/// Splits cycle notation into its groups, checking only the notation itself
/// and repeats inside the input.
fn parse_groups(notation: &str) -> Result<Vec<Vec<char>>> {
    let mut groups = Vec::new();
    let mut current: Option<Vec<char>> = None;

    for c in notation.chars() {
        match c {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "nested '(' in {notation:?}"
                    )));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(group) if !group.is_empty() => groups.push(group),
                Some(_) => {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "empty cycle in {notation:?}"
                    )))
                }
                None => {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "unmatched ')' in {notation:?}"
                    )))
                }
            },
            c => match current.as_mut() {
                Some(group) => group.push(c),
                None if c.is_whitespace() => {}
                None => {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "{c:?} outside parentheses in {notation:?}"
                    )))
                }
            },
        }
    }
    if current.is_some() {
        return Err(EnigmaError::MalformedCycle(format!(
            "unclosed '(' in {notation:?}"
        )));
    }

    let mut seen = std::collections::HashSet::new();
    for c in groups.iter().flatten() {
        if !seen.insert(*c) {
            return Err(EnigmaError::MalformedCycle(format!(
                "{c:?} appears twice in {notation:?}"
            )));
        }
    }
    Ok(groups)
}
