//! The rotor machine: slot layout, stepping and the per-symbol pipeline.
//!
//! Slot 0 holds the reflector and slot `R - 1` the fast rotor. The
//! rightmost `P` slots hold moving rotors, one per pawl; the slots between
//! the reflector and the pawls hold fixed rotors.
//!
//! ```text
//! key -> plugboard -> slot R-1 .. slot 1 -> reflector -> slot 1 .. slot R-1 -> plugboard -> lamp
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::alphabet::Alphabet;
use crate::catalogue::RotorCatalogue;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// A configured Enigma-class machine.
///
/// # Examples
///
/// ```
/// use enigma_rotor::historical;
///
/// let mut m = historical::machine_config().unwrap().build().unwrap();
/// m.insert_rotors(&["B", "Beta", "I", "II", "III"]).unwrap();
/// m.set_rotors("AAAA").unwrap();
/// let cipher = m.convert("HELLO").unwrap();
///
/// m.set_rotors("AAAA").unwrap();
/// assert_eq!(m.convert(&cipher).unwrap(), "HELLO");
/// ```
#[derive(Debug, Clone)]
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    pawls: usize,
    catalogue: Arc<RotorCatalogue>,
    rotors: Vec<Rotor>,
    plugboard: Permutation,
}

impl Machine {
    /// A machine with `num_rotors` slots and `pawls` pawls drawing its rotors
    /// from `catalogue`. No rotors are installed and the plugboard is the
    /// identity.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] unless `1 <= num_rotors`,
    /// `pawls < num_rotors`, and the catalogue shares `alphabet`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        pawls: usize,
        catalogue: Arc<RotorCatalogue>,
    ) -> Result<Self> {
        if num_rotors == 0 {
            return Err(EnigmaError::InvalidConfiguration(
                "machine needs at least one rotor slot".into(),
            ));
        }
        if pawls >= num_rotors {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "{pawls} pawls do not fit in {num_rotors} slots"
            )));
        }
        if catalogue.alphabet().as_ref() != alphabet.as_ref() {
            return Err(EnigmaError::InvalidConfiguration(
                "rotor catalogue uses a different alphabet".into(),
            ));
        }
        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Machine {
            alphabet,
            num_rotors,
            pawls,
            catalogue,
            rotors: Vec::with_capacity(num_rotors),
            plugboard,
        })
    }

    /// Number of rotor slots.
    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    /// Number of pawls, and so of moving rotors.
    pub fn num_pawls(&self) -> usize {
        self.pawls
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn catalogue(&self) -> &Arc<RotorCatalogue> {
        &self.catalogue
    }

    /// The rotor in slot `k`; slot 0 is the reflector.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.rotors.get(k)
    }

    /// Installed rotors, reflector first.
    pub fn rotors(&self) -> &[Rotor] {
        &self.rotors
    }

    /// True once a full set of rotors is installed.
    pub fn is_ready(&self) -> bool {
        !self.rotors.is_empty() && self.rotors.len() == self.num_rotors
    }

    /// Installs the catalogue rotors named by `names`, reflector first, each
    /// at setting and ring 0.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] for the wrong number of names, an
    /// unknown or repeated name, or a rotor in a slot of the wrong kind. The
    /// previous installation is kept on error.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_rotors {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "expected {} rotors, got {}",
                self.num_rotors,
                names.len()
            )));
        }

        let names: Vec<&str> = names.iter().map(AsRef::as_ref).collect();
        let first_moving = self.num_rotors - self.pawls;
        let mut staged: Vec<Rotor> = Vec::with_capacity(self.num_rotors);
        for (slot, &name) in names.iter().enumerate() {
            let rotor = self.catalogue.get(name).ok_or_else(|| {
                EnigmaError::InvalidConfiguration(format!("no rotor named {name}"))
            })?;
            if staged.iter().any(|r| r.name() == name) {
                return Err(EnigmaError::InvalidConfiguration(format!(
                    "rotor {name} installed twice"
                )));
            }
            if slot == 0 && !rotor.reflecting() {
                return Err(EnigmaError::InvalidConfiguration(format!(
                    "slot 0 must hold a reflector, not {name}"
                )));
            }
            if slot != 0 && rotor.reflecting() {
                return Err(EnigmaError::InvalidConfiguration(format!(
                    "reflector {name} can only go in slot 0"
                )));
            }
            if slot < first_moving && rotor.rotates() {
                return Err(EnigmaError::InvalidConfiguration(format!(
                    "moving rotor {name} in slot {slot} has no pawl"
                )));
            }
            if slot >= first_moving && !rotor.rotates() {
                return Err(EnigmaError::InvalidConfiguration(format!(
                    "slot {slot} needs a moving rotor, {name} does not move"
                )));
            }
            staged.push(rotor.clone());
        }

        debug!(rotors = ?names, "installed rotors");
        self.rotors = staged;
        Ok(())
    }

    /// Sets the positions of slots 1..R from `setting`, leftmost first.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] if no rotors are installed,
    /// `setting` is not `R - 1` symbols long, or holds a symbol outside the
    /// alphabet. Rotor positions are unchanged on error.
    pub fn set_rotors(&mut self, setting: &str) -> Result<()> {
        let positions = self.window_indices(setting, "setting")?;
        let mut staged = self.rotors.clone();
        for (rotor, posn) in staged.iter_mut().skip(1).zip(positions) {
            rotor.set(posn)?;
        }
        self.rotors = staged;
        debug!(setting, "rotor settings applied");
        Ok(())
    }

    /// Sets the ring offsets of slots 1..R from `ring`, leftmost first.
    ///
    /// # Errors
    /// As for [`Machine::set_rotors`].
    pub fn set_rotor_ring(&mut self, ring: &str) -> Result<()> {
        let positions = self.window_indices(ring, "ring setting")?;
        let mut staged = self.rotors.clone();
        for (rotor, posn) in staged.iter_mut().skip(1).zip(positions) {
            rotor.set_ring(posn)?;
        }
        self.rotors = staged;
        debug!(ring, "ring settings applied");
        Ok(())
    }

    fn window_indices(&self, window: &str, what: &str) -> Result<Vec<usize>> {
        if !self.is_ready() {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "{what} applied before rotors were installed"
            )));
        }
        let expected = self.num_rotors - 1;
        let len = window.chars().count();
        if len != expected {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "{what} {window:?} has {len} symbols, expected {expected}"
            )));
        }
        window
            .chars()
            .map(|c| {
                self.alphabet.to_index(c).map_err(|_| {
                    EnigmaError::InvalidConfiguration(format!(
                        "{what} {window:?} contains {c:?}, which is not in the alphabet"
                    ))
                })
            })
            .collect()
    }

    /// Current positions of slots 1..R as symbols, leftmost first.
    pub fn settings(&self) -> String {
        self.rotors
            .iter()
            .skip(1)
            .map(|r| self.alphabet.to_symbol(r.setting()))
            .collect()
    }

    pub fn plugboard(&self) -> &Permutation {
        &self.plugboard
    }

    /// Mutable access for adding plugboard cycles.
    pub fn plugboard_mut(&mut self) -> &mut Permutation {
        &mut self.plugboard
    }

    /// Replaces the plugboard.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] if `plugboard` is over another
    /// alphabet.
    pub fn set_plugboard(&mut self, plugboard: Permutation) -> Result<()> {
        if plugboard.alphabet().as_ref() != self.alphabet.as_ref() {
            return Err(EnigmaError::InvalidConfiguration(
                "plugboard uses a different alphabet".into(),
            ));
        }
        debug!(plugboard = %plugboard, "plugboard replaced");
        self.plugboard = plugboard;
        Ok(())
    }

    /// Steps the machine once.
    ///
    /// The fast rotor always turns. Any other moving rotor turns when its
    /// right neighbour is at a notch, or when it is at a notch itself and
    /// its left neighbour also has a pawl; the second rule is the
    /// double step. All notches are read before anything moves.
    fn advance_rotors(&mut self) {
        let r = self.rotors.len();
        if self.pawls == 0 || r == 0 {
            return;
        }
        let first_moving = r - self.pawls;
        let notched: Vec<bool> = self.rotors.iter().map(Rotor::at_notch).collect();

        let mut steps = vec![false; r];
        steps[r - 1] = true;
        for i in first_moving..r - 1 {
            let driven = notched[i + 1];
            let double_step = notched[i] && i > first_moving;
            steps[i] = driven || double_step;
        }

        for (rotor, step) in self.rotors.iter_mut().zip(steps) {
            if step {
                rotor.advance();
            }
        }
    }

    /// Steps the machine and enciphers index `c`.
    ///
    /// With no rotors installed only the plugboard applies.
    pub fn convert_index(&mut self, c: usize) -> usize {
        self.advance_rotors();

        let plugged = self.plugboard.permute(c);
        let mut p = plugged;
        for rotor in self.rotors.iter().rev() {
            p = rotor.convert_forward(p);
        }
        for rotor in self.rotors.iter().skip(1) {
            p = rotor.convert_backward(p);
        }
        let out = self.plugboard.permute(p);

        trace!(
            window = %self.settings(),
            input = %self.alphabet.to_symbol(c % self.alphabet.size()),
            plugged = %self.alphabet.to_symbol(plugged),
            output = %self.alphabet.to_symbol(out),
            "converted symbol"
        );
        out
    }

    /// Steps the machine and enciphers symbol `c`.
    pub fn convert_symbol(&mut self, c: char) -> Result<char> {
        let i = self.alphabet.to_index(c)?;
        let e = self.convert_index(i);
        Ok(self.alphabet.to_symbol(e))
    }

    /// Enciphers `msg`, stepping once per symbol.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] if no rotors are installed, and
    /// [`EnigmaError::InvalidSymbol`] for the first symbol outside the
    /// alphabet. On error the rotors have not moved.
    pub fn convert(&mut self, msg: &str) -> Result<String> {
        if !self.is_ready() {
            return Err(EnigmaError::InvalidConfiguration(
                "message converted before rotors were installed".into(),
            ));
        }
        let input = self.alphabet.indices(msg)?;
        let mut out = String::with_capacity(msg.len());
        for c in input {
            let e = self.convert_index(c);
            out.push(self.alphabet.to_symbol(e));
        }
        Ok(out)
    }
}
