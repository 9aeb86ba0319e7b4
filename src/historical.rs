//! Wiring tables of the Wehrmacht and Kriegsmarine machines.
//!
//! Each table gives, for `A..Z` in order, the letter a contact is wired
//! to at ring and setting `A`.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::catalogue::RotorCatalogue;
use crate::config::MachineConfig;
use crate::error::Result;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// Moving rotors: name, wiring, notches.
const MOVING: [(&str, &str, &str); 8] = [
    ("I", "EKMFLGDQVZNTOWYHXUSPAIBRCJ", "Q"),
    ("II", "AJDKSIRUXBLHWTMCQGZNPYFVOE", "E"),
    ("III", "BDFHJLCPRTXVZNYEIWGAKMUSQO", "V"),
    ("IV", "ESOVPZJAYQUIRHXLNFTGKDCMWB", "J"),
    ("V", "VZBRGITYUPSDNHLXAWMJQOFECK", "Z"),
    ("VI", "JPGVOUMFYQBENHZRDKASXLICTW", "ZM"),
    ("VII", "NZJHGRCXMYSWBOUFAIVLPEKQDT", "ZM"),
    ("VIII", "FKQHTLXOCBJSPDZRAMEWNIUYGV", "ZM"),
];

/// Greek-letter fourth rotors of the naval M4.
const FIXED: [(&str, &str); 2] = [
    ("Beta", "LEYJVCNIXWPBQMDRTAKZGFUHOS"),
    ("Gamma", "FSOKANUERHMBTIYCWLQPZXVGJD"),
];

const REFLECTORS: [(&str, &str); 4] = [
    ("B", "YRUHQSLDPXNGOKMIEBFZCWVJAT"),
    ("C", "FVPJIAOYEDRZXWGCTKUQSBNMHL"),
    ("B-thin", "ENKQAUYWJICOPBLMDXZVFTHRGS"),
    ("C-thin", "RDOBJNTKVEHMLFCWZAXGYIPSUQ"),
];

/// All historical rotors over `A..Z`.
pub fn catalogue() -> Result<RotorCatalogue> {
    let alpha = Arc::new(Alphabet::upper());
    let mut cat = RotorCatalogue::new(alpha.clone());
    for (name, images) in REFLECTORS {
        cat.insert(Rotor::reflector(
            name,
            Permutation::from_mapping(images, alpha.clone())?,
        ))?;
    }
    for (name, images) in FIXED {
        cat.insert(Rotor::fixed(
            name,
            Permutation::from_mapping(images, alpha.clone())?,
        ))?;
    }
    for (name, images, notches) in MOVING {
        cat.insert(Rotor::moving(
            name,
            Permutation::from_mapping(images, alpha.clone())?,
            notches,
        )?)?;
    }
    Ok(cat)
}

/// The naval layout: reflector, one Greek rotor and three moving rotors.
pub fn machine_config() -> Result<MachineConfig> {
    let cat = catalogue()?;
    MachineConfig::new(5, 3, cat)
}

/// The three-rotor army layout: reflector and three moving rotors.
pub fn army_config() -> Result<MachineConfig> {
    let cat = catalogue()?;
    MachineConfig::new(4, 3, cat)
}
