//! The read-only set of rotors a machine may install.

use std::collections::HashMap;
use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::rotor::Rotor;

/// Every rotor available to a machine, keyed by name.
///
/// A catalogue is filled once while loading a configuration and then shared
/// behind an `Arc` by any number of machines. Machines copy rotors out of
/// it; the wiring itself is never duplicated or changed.
#[derive(Debug, Clone)]
pub struct RotorCatalogue {
    alphabet: Arc<Alphabet>,
    rotors: Vec<Rotor>,
    by_name: HashMap<String, usize>,
}

impl RotorCatalogue {
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        RotorCatalogue {
            alphabet,
            rotors: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Adds `rotor` to the catalogue.
    ///
    /// # Errors
    /// [`EnigmaError::InvalidConfiguration`] if a rotor of the same name is
    /// already present or the rotor is wired over a different alphabet.
    pub fn insert(&mut self, rotor: Rotor) -> Result<()> {
        if self.by_name.contains_key(rotor.name()) {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "rotor {} defined twice",
                rotor.name()
            )));
        }
        if rotor.alphabet() != self.alphabet.as_ref() {
            return Err(EnigmaError::InvalidConfiguration(format!(
                "rotor {} is wired over a different alphabet",
                rotor.name()
            )));
        }
        self.by_name.insert(rotor.name().to_string(), self.rotors.len());
        self.rotors.push(rotor);
        Ok(())
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// The rotor called `name`, at setting and ring 0.
    pub fn get(&self, name: &str) -> Option<&Rotor> {
        self.by_name.get(name).map(|&i| &self.rotors[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }

    /// Rotors in the order they were added.
    pub fn iter(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.iter()
    }

    /// Number of rotors that can turn.
    pub fn moving_count(&self) -> usize {
        self.rotors.iter().filter(|r| r.rotates()).count()
    }
}
