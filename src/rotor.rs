//! Rotors: wired permutations mounted at a rotational offset.

use std::fmt;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;

/// How a rotor behaves in the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Leftmost rotor; sends the signal back and never turns.
    Reflector,
    /// Sits in a slot without a pawl and never turns.
    Fixed,
    /// Turned by a pawl. `notches` holds the alphabet indices at which the
    /// rotor lets its left neighbour advance.
    Moving { notches: Vec<usize> },
}

/// A rotor: a name, a wiring fixed at construction, and the mutable
/// setting and ring offsets.
///
/// The wiring is behind an `Arc`, so cloning a rotor out of a catalogue
/// copies only its position, never the permutation tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rotor {
    name: Arc<str>,
    kind: RotorKind,
    wiring: Arc<Permutation>,
    setting: usize,
    ring: usize,
}

impl Rotor {
    /// A reflector named `name` wired as `wiring`.
    pub fn reflector(name: &str, wiring: Permutation) -> Self {
        Rotor::build(name, RotorKind::Reflector, wiring)
    }

    /// A non-moving rotor named `name` wired as `wiring`.
    pub fn fixed(name: &str, wiring: Permutation) -> Self {
        Rotor::build(name, RotorKind::Fixed, wiring)
    }

    /// A moving rotor whose notches sit at the symbols of `notches`.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] when `notches` is empty and
    /// [`EnigmaError::InvalidSymbol`] when it names a symbol outside the
    /// wiring's alphabet.
    pub fn moving(name: &str, wiring: Permutation, notches: &str) -> Result<Self> {
        let mut positions = Vec::new();
        for c in notches.chars() {
            let i = wiring.alphabet().to_index(c)?;
            if !positions.contains(&i) {
                positions.push(i);
            }
        }
        if positions.is_empty() {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "moving rotor {name} needs at least one notch"
            )));
        }
        Ok(Rotor::build(
            name,
            RotorKind::Moving { notches: positions },
            wiring,
        ))
    }

    fn build(name: &str, kind: RotorKind, wiring: Permutation) -> Self {
        Rotor {
            name: Arc::from(name),
            kind,
            wiring: Arc::new(wiring),
            setting: 0,
            ring: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// The wiring at offset 0.
    pub fn permutation(&self) -> &Permutation {
        &self.wiring
    }

    pub fn alphabet(&self) -> &Alphabet {
        self.wiring.alphabet()
    }

    pub fn size(&self) -> usize {
        self.wiring.size()
    }

    /// True iff the rotor has a ratchet and can move.
    pub fn rotates(&self) -> bool {
        matches!(self.kind, RotorKind::Moving { .. })
    }

    pub fn reflecting(&self) -> bool {
        matches!(self.kind, RotorKind::Reflector)
    }

    pub fn setting(&self) -> usize {
        self.setting
    }

    pub fn ring(&self) -> usize {
        self.ring
    }

    /// Symbols at which the rotor notches, empty unless it moves.
    pub fn notches(&self) -> String {
        match &self.kind {
            RotorKind::Moving { notches } => notches
                .iter()
                .map(|&i| self.alphabet().to_symbol(i))
                .collect(),
            RotorKind::Reflector | RotorKind::Fixed => String::new(),
        }
    }

    /// Sets the rotor's position to `posn`.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] if `posn` is out of range, or
    /// non-zero for a reflector.
    pub fn set(&mut self, posn: usize) -> Result<()> {
        self.setting = self.checked_offset(posn, "setting")?;
        Ok(())
    }

    /// Sets the rotor's position to the index of `c`.
    pub fn set_symbol(&mut self, c: char) -> Result<()> {
        let posn = self.alphabet().to_index(c)?;
        self.set(posn)
    }

    /// Sets the ring offset to `posn`, with the same restrictions as
    /// [`Rotor::set`].
    pub fn set_ring(&mut self, posn: usize) -> Result<()> {
        self.ring = self.checked_offset(posn, "ring")?;
        Ok(())
    }

    pub fn set_ring_symbol(&mut self, c: char) -> Result<()> {
        let posn = self.alphabet().to_index(c)?;
        self.set_ring(posn)
    }

    fn checked_offset(&self, posn: usize, what: &str) -> Result<usize> {
        if posn >= self.size() {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "{what} {posn} out of range for rotor {}",
                self.name
            )));
        }
        if self.reflecting() && posn != 0 {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "reflector {} cannot take {what} {posn}",
                self.name
            )));
        }
        Ok(posn)
    }

    /// True iff the rotor is positioned to let its left neighbour advance.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Turns the rotor one position; does nothing unless it moves.
    pub fn advance(&mut self) {
        if let RotorKind::Moving { .. } = self.kind {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Passes contact `p` from right to left through the rotor.
    pub fn convert_forward(&self, p: usize) -> usize {
        let shift = self.shift();
        let alpha = self.alphabet();
        let entered = alpha.wrap(p as isize + shift);
        alpha.wrap(self.wiring.permute(entered) as isize - shift)
    }

    /// Passes contact `e` from left to right through the rotor.
    pub fn convert_backward(&self, e: usize) -> usize {
        let shift = self.shift();
        let alpha = self.alphabet();
        let entered = alpha.wrap(e as isize + shift);
        alpha.wrap(self.wiring.invert(entered) as isize - shift)
    }

    fn shift(&self) -> isize {
        self.setting as isize - self.ring as isize
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RotorKind::Reflector => write!(f, "Reflector {}", self.name),
            RotorKind::Fixed => write!(f, "FixedRotor {}", self.name),
            RotorKind::Moving { .. } => write!(f, "MovingRotor {}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiring(images: &str) -> Permutation {
        Permutation::from_mapping(images, Arc::new(Alphabet::upper())).unwrap()
    }

    fn rotor_i() -> Rotor {
        Rotor::moving("I", wiring("EKMFLGDQVZNTOWYHXUSPAIBRCJ"), "Q").unwrap()
    }

    #[test]
    fn kinds() {
        let b = Rotor::reflector("B", wiring("YRUHQSLDPXNGOKMIEBFZCWVJAT"));
        let beta = Rotor::fixed("Beta", wiring("LEYJVCNIXWPBQMDRTAKZGFUHOS"));
        let i = rotor_i();
        assert!(b.reflecting() && !b.rotates());
        assert!(!beta.reflecting() && !beta.rotates());
        assert!(!i.reflecting() && i.rotates());
        assert_eq!(i.notches(), "Q");
        assert_eq!(i.kind(), &RotorKind::Moving { notches: vec![16] });
        assert_eq!(beta.kind(), &RotorKind::Fixed);
        assert_eq!(beta.notches(), "");
        assert_eq!(i.to_string(), "MovingRotor I");
    }

    #[test]
    fn moving_needs_notches() {
        let err = Rotor::moving("X", wiring("EKMFLGDQVZNTOWYHXUSPAIBRCJ"), "");
        assert!(matches!(err, Err(EnigmaError::InvalidConfiguration(_))));
        let err = Rotor::moving("X", wiring("EKMFLGDQVZNTOWYHXUSPAIBRCJ"), "q");
        assert_eq!(err, Err(EnigmaError::InvalidSymbol('q')));
    }

    #[test]
    fn reflector_stays_at_zero() {
        let mut b = Rotor::reflector("B", wiring("YRUHQSLDPXNGOKMIEBFZCWVJAT"));
        assert!(b.set(0).is_ok());
        for posn in 1..26 {
            assert!(matches!(b.set(posn), Err(EnigmaError::InvalidConfiguration(_))));
        }
        assert!(b.set_ring_symbol('C').is_err());
        assert_eq!(b.setting(), 0);
        b.advance();
        assert_eq!(b.setting(), 0);
    }

    #[test]
    fn set_out_of_range() {
        let mut i = rotor_i();
        assert!(i.set(26).is_err());
        assert_eq!(i.set_symbol('a'), Err(EnigmaError::InvalidSymbol('a')));
        assert_eq!(i.setting(), 0);
    }

    #[test]
    fn advance_wraps_and_notch() {
        let mut i = rotor_i();
        i.set_symbol('P').unwrap();
        assert!(!i.at_notch());
        i.advance();
        assert!(i.at_notch());
        i.set_symbol('Z').unwrap();
        i.advance();
        assert_eq!(i.setting(), 0);
    }

    #[test]
    fn fixed_never_moves() {
        let mut beta = Rotor::fixed("Beta", wiring("LEYJVCNIXWPBQMDRTAKZGFUHOS"));
        beta.set(3).unwrap();
        beta.advance();
        assert_eq!(beta.setting(), 3);
        assert!(!beta.at_notch());
    }

    #[test]
    fn convert_at_zero_follows_wiring() {
        let i = rotor_i();
        assert_eq!(i.convert_forward(0), 4); // A -> E
        assert_eq!(i.convert_backward(4), 0);
    }

    #[test]
    fn convert_with_setting_and_ring() {
        let mut i = rotor_i();
        i.set_symbol('B').unwrap();
        // Contact A meets wiring B -> K, which leaves at contact J.
        assert_eq!(i.convert_forward(0), 9);
        i.set_ring_symbol('B').unwrap();
        assert_eq!(i.convert_forward(0), 4);
    }

    #[test]
    fn forward_backward_inverse() {
        let mut i = rotor_i();
        for s in 0..26 {
            i.set(s).unwrap();
            i.set_ring((s * 7) % 26).unwrap();
            for p in 0..26 {
                assert_eq!(i.convert_backward(i.convert_forward(p)), p);
            }
        }
    }
}
